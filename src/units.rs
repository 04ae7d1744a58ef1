pub mod temperature {
    pub fn k2c(temp_k: f64) -> f64 {
        temp_k - 273.15
    }

    #[test]
    fn test_temperature() {
        assert_eq!(k2c(273.15), 0.0);
        assert_eq!(k2c(373.15), 100.0);
    }
}
