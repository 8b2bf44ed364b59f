// WGS-84 constants
pub const EARTH_RADIUS_KM: f64 = 6378.137;
pub const EARTH_E2: f64 = 0.00669437999014;

const MAX_ITERATIONS: usize = 20;
const LATITUDE_TOLERANCE_RAD: f64 = 1e-12;

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// ECEF (km) to geodetic latitude/longitude (degrees) and height (km).
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - EARTH_E2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + EARTH_E2 * n * sin_lat).atan2(p);
        let converged = (next - lat).abs() < LATITUDE_TOLERANCE_RAD;
        lat = next;
        if converged {
            break;
        }
    }

    let sin_lat = lat.sin();
    let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
    let cos_lat = lat.cos();
    let alt = if cos_lat.abs() > 1e-9 {
        p / cos_lat - n
    } else {
        z.abs() - n * (1.0 - EARTH_E2)
    };

    (lat.to_degrees(), lon.to_degrees(), alt)
}

pub fn magnitude(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
