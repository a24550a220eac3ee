//! Integration tests for rc-app.

use rc_core::{Column, ColumnKind, Table, Value};
use rc_crs::NoShapefileSupport;
use rc_network::CsvGraphLoader;

use crate::{AppContext, AppContextBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn app() -> AppContext<CsvGraphLoader, NoShapefileSupport> {
    AppContextBuilder::new(CsvGraphLoader, NoShapefileSupport).build().unwrap()
}

fn points_table(rows: &[(&str, f64, f64)]) -> Table {
    let mut t = Table::new(
        "points",
        vec![
            Column::new("location-key", ColumnKind::Text),
            Column::new("latitude", ColumnKind::Double),
            Column::new("longitude", ColumnKind::Double),
        ],
    );
    for &(id, lat, lon) in rows {
        t.push_row(vec![Value::from(id), Value::from(lat), Value::from(lon)]).unwrap();
    }
    t
}

/// Three nodes in a line along the equator, 100 m and 10 s per hop.
fn write_line_graph(dir: &std::path::Path) {
    std::fs::write(dir.join("nodes.csv"), "id,lat,lon\n1,0,0\n2,0,1\n3,0,2\n").unwrap();
    std::fs::write(
        dir.join("edges.csv"),
        "from,to,length_m,travel_ms,oneway\n1,2,100,10000,\n2,3,100,10000,\n",
    )
    .unwrap();
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use rc_cache::{MB, names};
    use rc_crs::CoordinateSystem;

    use super::*;
    use crate::{AppError, CachePolicy};

    #[test]
    fn builds_with_default_policy() {
        let app = app();
        assert_eq!(*app.policy(), CachePolicy::default());
        assert_eq!(app.policy().matrix_bytes, 128 * MB);
        assert_eq!(app.policy().shapefile_dataset_bytes, 512 * MB);
        assert!(!app.is_disposed());
    }

    #[test]
    fn registers_every_cache() {
        let app = app();
        let mut registered = app.caches().names();
        registered.sort();
        let mut expected = vec![
            names::DISTANCE_MATRIX,
            names::ROUTE_GEOMETRY,
            names::GEOMETRY_MERGER,
            names::GEOMETRY_BORDER,
            names::SHAPEFILE_GEOMETRY,
            names::SHAPEFILE_DATASET,
        ];
        expected.sort();
        assert_eq!(registered, expected);

        let stats = app.caches().stats(names::DISTANCE_MATRIX).unwrap();
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn merge_and_border_caches_reachable_by_name() {
        use rc_core::{Geometry, LineString};

        let app = app();
        let merge = app.caches().get::<String, Geometry>(names::GEOMETRY_MERGER).unwrap();
        let border = app.caches().get::<String, Geometry>(names::GEOMETRY_BORDER).unwrap();
        assert_eq!(merge.capacity_bytes(), 64 * MB);
        assert!(app.caches().get::<String, String>(names::GEOMETRY_MERGER).is_none());

        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]));
        assert!(merge.put("regions".to_owned(), line.clone(), 256));
        assert!(border.put("regions".to_owned(), line, 256));
        assert_eq!(app.caches().stats(names::GEOMETRY_MERGER).unwrap().entries, 1);

        app.caches().clear_all();
        assert!(merge.is_empty() && border.is_empty());
    }

    #[test]
    fn custom_policy_sizes_caches() {
        let policy = CachePolicy { route_geometry_bytes: 3 * MB, ..Default::default() };
        let app = AppContextBuilder::new(CsvGraphLoader, NoShapefileSupport)
            .policy(policy)
            .build()
            .unwrap();
        assert_eq!(app.distance().route_cache().capacity_bytes(), 3 * MB);
        assert_eq!(app.crs().geometry_cache().capacity_bytes(), 256 * MB);
    }

    #[test]
    fn zero_capacity_rejected() {
        let policy = CachePolicy { geometry_border_bytes: 0, ..Default::default() };
        let err = AppContextBuilder::new(CsvGraphLoader, NoShapefileSupport)
            .policy(policy)
            .build()
            .unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("geometry_border_bytes"), "{msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn coordinate_systems_initialised() {
        let app = app();
        assert!(app.crs().is_initialized());
        assert_eq!(app.crs().wgs84(), CoordinateSystem::Wgs84);
    }
}

// ── Distance through the context ─────────────────────────────────────────────

#[cfg(test)]
mod distance_tests {
    use rc_core::{NoopContext, TableSource};
    use rc_distance::DistanceConfiguration;

    use super::*;
    use crate::LoggingContext;

    #[test]
    fn great_circle_matrix_is_cached() {
        let app = app();
        let points = points_table(&[("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 2.0, 0.0)]);
        let tables: [&dyn TableSource; 1] = [&points];
        let config = DistanceConfiguration::great_circle();

        let first = app.distance().calculate(&config, &tables, &NoopContext).unwrap().unwrap();
        let second = app.distance().calculate(&config, &tables, &NoopContext).unwrap().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first.size(), 3);
        assert_eq!(app.distance().matrix_cache().len(), 1);
    }

    #[test]
    fn road_network_matrix_from_csv_graph() {
        let dir = tempfile::tempdir().unwrap();
        write_line_graph(dir.path());

        let app = app();
        let points = points_table(&[("west", 0.0, 0.0), ("east", 0.0, 2.0)]);
        let tables: [&dyn TableSource; 1] = [&points];
        let config = DistanceConfiguration::road_network(dir.path());

        let m = app
            .distance()
            .calculate(&config, &tables, &LoggingContext::new("test"))
            .unwrap()
            .unwrap();
        let east = m.index_of("east").unwrap();
        let west = m.index_of("west").unwrap();
        assert!((m.distance(west, east) - 0.2).abs() < 1e-9); // km
        assert!(m.time(west, east).is_finite());
        assert_eq!(m.distance(west, west), 0.0);
        assert_eq!(app.distance().loaded_graph_dir().as_deref(), Some(dir.path()));
    }

    #[test]
    fn cancelled_context_yields_nothing() {
        let app = app();
        let points = points_table(&[("a", 0.0, 0.0), ("b", 1.0, 0.0)]);
        let tables: [&dyn TableSource; 1] = [&points];

        let ctx = LoggingContext::new("cancelled");
        ctx.cancel();
        let result = app
            .distance()
            .calculate(&DistanceConfiguration::great_circle(), &tables, &ctx)
            .unwrap();
        assert!(result.is_none());
        assert!(app.distance().matrix_cache().is_empty());
    }
}

// ── Dispose ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispose_tests {
    use rc_core::{NoopContext, TableSource};
    use rc_distance::DistanceConfiguration;

    use super::*;

    #[test]
    fn dispose_is_idempotent() {
        let app = app();
        assert!(app.dispose());
        assert!(app.is_disposed());
        assert!(!app.dispose());
        assert!(!app.dispose());
    }

    #[test]
    fn dispose_releases_graph_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_line_graph(dir.path());

        let app = app();
        let points = points_table(&[("a", 0.0, 0.0), ("b", 0.0, 1.0)]);
        let tables: [&dyn TableSource; 1] = [&points];
        app.distance()
            .calculate(&DistanceConfiguration::road_network(dir.path()), &tables, &NoopContext)
            .unwrap()
            .unwrap();
        assert!(app.distance().loaded_graph_dir().is_some());
        assert_eq!(app.distance().matrix_cache().len(), 1);

        app.dispose();
        assert!(app.distance().loaded_graph_dir().is_none());
        assert!(app.distance().matrix_cache().is_empty());
    }
}
