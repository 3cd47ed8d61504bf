use std::f64::consts::PI;

use crate::core::{
    Position, VINCENTY_CONVERGENCE_THRESHOLD, VINCENTY_MAX_ITERATIONS, WGS84_FLATTENING,
    WGS84_SEMI_MAJOR_AXIS_M, WGS84_SEMI_MINOR_AXIS_M,
};

/// Geodesic distance between two positions on the WGS-84 ellipsoid (m)
///
/// Vincenty's inverse formula. The lambda iteration stops once successive
/// values differ by less than 1e-12 rad or after 100 rounds; in the latter
/// case (nearly antipodal points) the last iterate is used as is.
/// Coincident points and equatorial lines are handled without producing NaN.
/// The result is exactly symmetric in its arguments.
pub fn vincenty_distance(a: Position, b: Position) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    // iterate in one fixed argument order so that d(a, b) == d(b, a) bit for bit
    let (a, b) = if a
        .latitude
        .total_cmp(&b.latitude)
        .then(a.longitude.total_cmp(&b.longitude))
        .is_gt()
    {
        (b, a)
    } else {
        (a, b)
    };

    let f = WGS84_FLATTENING;
    let semi_major = WGS84_SEMI_MAJOR_AXIS_M;
    let semi_minor = WGS84_SEMI_MINOR_AXIS_M;

    let lat1 = a.latitude * PI / 180.0;
    let lat2 = b.latitude * PI / 180.0;
    let lon1 = a.longitude * PI / 180.0;
    let lon2 = b.longitude * PI / 180.0;

    let l = lon2 - lon1;
    let u1 = ((1.0 - f) * lat1.tan()).atan();
    let u2 = ((1.0 - f) * lat2.tan()).atan();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos2_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let east = cos_u2 * sin_lambda;
        let north = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (east * east + north * north).sqrt();

        if sin_sigma == 0.0 {
            // coincident points
            return 0.0;
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha;

        if cos_2sigma_m.is_nan() {
            // equatorial line: cos2_alpha == 0
            cos_2sigma_m = 0.0;
        }

        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_CONVERGENCE_THRESHOLD {
            break;
        }
    }

    let u_sq = cos2_alpha * (semi_major * semi_major - semi_minor * semi_minor)
        / (semi_minor * semi_minor);
    let coeff_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let coeff_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = coeff_b
        * sin_sigma
        * (cos_2sigma_m
            + coeff_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - coeff_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    semi_minor * coeff_a * (sigma - delta_sigma)
}
