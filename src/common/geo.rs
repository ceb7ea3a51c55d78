// src/common/geo.rs

use crate::common::error::AppError;

// Raio médio da Terra em metros
const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Distância de grande círculo entre dois pontos (fórmula de haversine),
// em metros.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

// Interpreta uma coordenada vinda como texto do app.
pub fn parse_coordinate(raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidCoordinates(raw.to_string()))
}

// Geofence: aceita o candidato até o raio máximo, inclusive; acima disso
// rejeita informando a distância medida.
pub fn ensure_within_radius(
    ref_lat: f64,
    ref_lon: f64,
    lat: f64,
    lon: f64,
    max_distance_m: f64,
) -> Result<f64, AppError> {
    let distance = haversine_distance_m(ref_lat, ref_lon, lat, lon);
    if distance > max_distance_m {
        return Err(AppError::OutsideGeofence { distance, max: max_distance_m });
    }
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meio_quilometro_no_equador() {
        // 0.0045° de longitude no equador ≈ 500m (tolerância de 5%)
        let d = haversine_distance_m(0.0, 0.0, 0.0, 0.0045);
        assert!((d - 500.0).abs() < 25.0, "distância calculada: {}", d);
    }

    #[test]
    fn distancia_zero_no_mesmo_ponto() {
        assert_eq!(haversine_distance_m(31.2304, 121.4737, 31.2304, 121.4737), 0.0);
    }

    #[test]
    fn candidato_no_limite_do_raio_e_aceito() {
        let d = haversine_distance_m(0.0, 0.0, 0.0, 0.0045);
        // Exatamente no raio medido: aceito.
        assert!(ensure_within_radius(0.0, 0.0, 0.0, 0.0045, d).is_ok());
    }

    #[test]
    fn candidato_alem_do_raio_e_rejeitado() {
        let d = haversine_distance_m(0.0, 0.0, 0.0, 0.0045);
        let err = ensure_within_radius(0.0, 0.0, 0.0, 0.0045, d - 1.0).unwrap_err();
        match err {
            AppError::OutsideGeofence { distance, max } => {
                assert!(distance > max);
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[test]
    fn coordenada_em_texto() {
        assert_eq!(parse_coordinate("31.2304").unwrap(), 31.2304);
        assert_eq!(parse_coordinate(" -23.55 ").unwrap(), -23.55);
        assert!(parse_coordinate("norte").is_err());
        assert!(parse_coordinate("").is_err());
    }
}
