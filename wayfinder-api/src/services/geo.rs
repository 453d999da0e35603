//! Great-circle distance and the nearby-places computation.

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const NEARBY_RADIUS_KM: f64 = 12.0;
pub const NEARBY_LIMIT: usize = 8;

/// Haversine distance between two coordinate pairs, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Keep the candidates within `radius_km` of the origin, nearest first,
/// capped at `limit`. Distances are rounded to 0.1 km.
pub fn nearby<T>(
    origin: (f64, f64),
    candidates: Vec<(T, f64, f64)>,
    radius_km: f64,
    limit: usize,
) -> Vec<(T, f64)> {
    let mut within: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|(item, lat, lon)| {
            let distance_km = haversine_km(origin.0, origin.1, lat, lon);
            (distance_km <= radius_km).then(|| (item, (distance_km * 10.0).round() / 10.0))
        })
        .collect();

    within.sort_by(|a, b| a.1.total_cmp(&b.1));
    within.truncate(limit);
    within
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_distance() {
        assert_eq!(haversine_km(50.0, -5.0, 50.0, -5.0), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(50.0, -5.0, 51.0, -5.0);
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn candidate_just_past_the_radius_is_excluded() {
        // 0.109 degrees of latitude is roughly 12.1 km.
        let results = nearby(
            (50.0, -5.0),
            vec![("too_far", 50.109, -5.0)],
            NEARBY_RADIUS_KM,
            NEARBY_LIMIT,
        );
        assert!(results.is_empty());
    }

    #[test]
    fn results_are_sorted_nearest_first_and_capped() {
        let origin = (50.0, -5.0);
        let candidates: Vec<(usize, f64, f64)> = (1..=10)
            .rev()
            .map(|i| (i, 50.0 + 0.008 * i as f64, -5.0))
            .collect();

        let results = nearby(origin, candidates, NEARBY_RADIUS_KM, NEARBY_LIMIT);
        assert_eq!(results.len(), NEARBY_LIMIT);
        assert_eq!(results[0].0, 1);
        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn distances_are_rounded_to_one_decimal() {
        let results = nearby((50.0, -5.0), vec![("cafe", 50.05, -5.0)], 12.0, 8);
        assert_eq!(results.len(), 1);
        let distance = results[0].1;
        assert_eq!((distance * 10.0).round() / 10.0, distance);
        assert!((distance - 5.6).abs() < 0.11, "got {distance}");
    }
}
