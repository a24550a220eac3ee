//! Unit tests for rc-crs.

#[cfg(test)]
mod helpers {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rc_core::{Column, ColumnKind, Dataset, Geometry, LineString, Table, Value};

    use crate::{CrsError, CrsResult, ShapefileImporter, ShapefileLink};

    pub fn square(x: f64, y: f64) -> Geometry {
        Geometry::LineString(LineString::from(vec![
            (x, y),
            (x + 1.0, y),
            (x + 1.0, y + 1.0),
            (x, y + 1.0),
        ]))
    }

    /// Serves a fixed file `regions.shp` with four features (one without
    /// geometry, one with an empty one) and counts every import.
    #[derive(Default)]
    pub struct FakeImporter {
        pub link_imports:    AtomicUsize,
        pub dataset_imports: AtomicUsize,
        pub empty_dataset:   bool,
    }

    impl FakeImporter {
        pub fn link_imports(&self) -> usize {
            self.link_imports.load(Ordering::SeqCst)
        }

        pub fn dataset_imports(&self) -> usize {
            self.dataset_imports.load(Ordering::SeqCst)
        }
    }

    fn check(file: &Path) -> CrsResult<()> {
        if file.file_name().is_some_and(|n| n == "regions.shp") {
            Ok(())
        } else {
            Err(CrsError::Import { path: file.to_path_buf(), reason: "no such file".into() })
        }
    }

    impl ShapefileImporter for FakeImporter {
        fn import_links(
            &self,
            file:         &Path,
            search_field: &str,
        ) -> CrsResult<HashMap<ShapefileLink, Option<Geometry>>> {
            self.link_imports.fetch_add(1, Ordering::SeqCst);
            check(file)?;
            let link = |v: &str| ShapefileLink::new(file, "regions", search_field, v);
            Ok(HashMap::from([
                (link("north"), Some(square(0.0, 10.0))),
                (link("south"), Some(square(0.0, -10.0))),
                (link("nowhere"), None),
                (link("blank"), Some(Geometry::LineString(LineString::new(Vec::new())))),
            ]))
        }

        fn import_dataset(&self, file: &Path) -> CrsResult<Dataset> {
            self.dataset_imports.fetch_add(1, Ordering::SeqCst);
            check(file)?;
            let mut dataset = Dataset::new();
            if self.empty_dataset {
                return Ok(dataset);
            }
            let mut table = Table::new(
                "regions",
                vec![
                    Column::new("name", ColumnKind::Text),
                    Column::new("the_geom", ColumnKind::Geometry),
                ],
            );
            table.push_row(vec![Value::from("North"), Value::from(square(0.0, 10.0))])?;
            table.push_row(vec![Value::from("South"), Value::from(square(0.0, -10.0))])?;
            table.push_row(vec![Value::from("North"), Value::from(square(5.0, 5.0))])?;
            dataset.add_table(table);
            Ok(dataset)
        }
    }
}

#[cfg(test)]
mod systems {
    use crate::{CoordinateSystem, CrsError};

    #[test]
    fn parses_epsg_ids() {
        assert_eq!(CoordinateSystem::from_id("EPSG:4326").unwrap(), CoordinateSystem::Wgs84);
        assert_eq!(CoordinateSystem::from_id(" epsg : 3857 ").unwrap(), CoordinateSystem::WebMercator);
        assert_eq!(CoordinateSystem::from_id("900913").unwrap(), CoordinateSystem::WebMercator);
        assert_eq!(
            "EPSG:32630".parse::<CoordinateSystem>().unwrap(),
            CoordinateSystem::Utm { zone: 30, north: true }
        );
        assert_eq!(
            CoordinateSystem::from_id("32756").unwrap(),
            CoordinateSystem::Utm { zone: 56, north: false }
        );
    }

    #[test]
    fn rejects_unknown_ids() {
        for id in ["EPSG:27700", "ESRI:4326", "wgs84", "", "EPSG:32600", "EPSG:32661"] {
            let err = CoordinateSystem::from_id(id).unwrap_err();
            assert!(matches!(err, CrsError::UnknownSystem(_)), "{id}");
            assert!(err.is_config());
        }
    }

    #[test]
    fn display_round_trips_through_epsg() {
        for sys in [
            CoordinateSystem::Wgs84,
            CoordinateSystem::WebMercator,
            CoordinateSystem::Utm { zone: 1, north: true },
            CoordinateSystem::Utm { zone: 60, north: false },
        ] {
            assert_eq!(CoordinateSystem::from_id(&sys.to_string()).unwrap(), sys);
        }
    }
}

#[cfg(test)]
mod transforms {
    use rc_core::{Coord, Geometry, LineString, Polygon};

    use crate::{CoordinateSystem, CoordinateTransform};

    fn close(a: Coord, b: Coord, tol: f64) -> bool {
        (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol
    }

    #[test]
    fn web_mercator_known_values() {
        let t = CoordinateTransform::new(CoordinateSystem::Wgs84, CoordinateSystem::WebMercator);
        let edge = t.apply(Coord { x: 180.0, y: 0.0 });
        assert!((edge.x - 20_037_508.342_789_244).abs() < 1e-6);
        assert!(edge.y.abs() < 1e-6);

        let origin = t.apply(Coord { x: 0.0, y: 0.0 });
        assert!(close(origin, Coord { x: 0.0, y: 0.0 }, 1e-9));
    }

    #[test]
    fn web_mercator_round_trip() {
        let t = CoordinateTransform::new(CoordinateSystem::Wgs84, CoordinateSystem::WebMercator);
        let p = Coord { x: -0.1278, y: 51.5074 };
        let back = t.inverse().apply(t.apply(p));
        assert!(close(back, p, 1e-9));
    }

    #[test]
    fn utm_central_meridian_on_equator() {
        let north = CoordinateSystem::Utm { zone: 30, north: true };
        let south = CoordinateSystem::Utm { zone: 30, north: false };
        let p = Coord { x: -3.0, y: 0.0 };

        let n = north.from_wgs84(p);
        assert!(close(n, Coord { x: 500_000.0, y: 0.0 }, 1e-6));
        let s = south.from_wgs84(p);
        assert!(close(s, Coord { x: 500_000.0, y: 10_000_000.0 }, 1e-6));
    }

    #[test]
    fn utm_is_symmetric_about_central_meridian() {
        let zone = CoordinateSystem::Utm { zone: 31, north: true };
        let east = zone.from_wgs84(Coord { x: 3.0 + 1.5, y: 48.0 });
        let west = zone.from_wgs84(Coord { x: 3.0 - 1.5, y: 48.0 });
        assert!((east.x - 500_000.0 - (500_000.0 - west.x)).abs() < 1e-6);
        assert!((east.y - west.y).abs() < 1e-6);
        assert!(east.x > 500_000.0);
    }

    #[test]
    fn utm_round_trip() {
        for (zone, north, p) in [
            (30, true, Coord { x: -0.1278, y: 51.5074 }),
            (56, false, Coord { x: 151.2093, y: -33.8688 }),
            (18, true, Coord { x: -74.0060, y: 40.7128 }),
        ] {
            let t = CoordinateTransform::new(CoordinateSystem::Wgs84, CoordinateSystem::Utm { zone, north });
            let back = t.inverse().apply(t.apply(p));
            assert!(close(back, p, 1e-5), "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn between_projected_systems_goes_through_wgs84() {
        let utm = CoordinateSystem::Utm { zone: 30, north: true };
        let p = Coord { x: -0.1278, y: 51.5074 };
        let in_utm = utm.from_wgs84(p);

        let t = CoordinateTransform::new(utm, CoordinateSystem::WebMercator);
        let direct = CoordinateSystem::WebMercator.from_wgs84(p);
        assert!(close(t.apply(in_utm), direct, 0.5));
    }

    #[test]
    fn geometry_keeps_shape() {
        let t = CoordinateTransform::new(CoordinateSystem::Wgs84, CoordinateSystem::WebMercator);
        let g = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (180.0, 0.0)]));
        let Geometry::LineString(line) = t.apply_geometry(&g) else {
            panic!("shape changed");
        };
        assert_eq!(line.0.len(), 2);
        assert!((line.0[1].x - 20_037_508.342_789_244).abs() < 1e-6);

        let poly = Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (90.0, 0.0), (0.0, 45.0)]),
            vec![],
        ));
        let Geometry::Polygon(projected) = t.apply_geometry(&poly) else {
            panic!("shape changed");
        };
        assert_eq!(projected.exterior().0.len(), 4);
        assert!((projected.exterior().0[1].x - 20_037_508.342_789_244 / 2.0).abs() < 1e-6);

        let same = CoordinateTransform::new(CoordinateSystem::Wgs84, CoordinateSystem::Wgs84);
        assert!(same.is_identity());
        assert_eq!(same.apply_geometry(&g), g);
    }
}

#[cfg(test)]
mod registry {
    use std::path::Path;
    use std::sync::Arc;

    use crate::{AxisOrder, CoordinateSystem, CoordinateSystemRegistry, ShapefileLink};

    use super::helpers::{FakeImporter, square};

    const MB: usize = 1024 * 1024;

    fn registry() -> CoordinateSystemRegistry<FakeImporter> {
        CoordinateSystemRegistry::new(FakeImporter::default(), MB, MB)
    }

    #[test]
    fn initialisation_is_idempotent() {
        let reg = registry();
        assert!(!reg.is_initialized());
        let first = *reg.initialize();
        let second = *reg.initialize();
        assert_eq!(first, second);
        assert_eq!(first.axis_order, AxisOrder::LonLat);
        assert_eq!(reg.wgs84(), CoordinateSystem::Wgs84);
        assert!(reg.is_initialized());
    }

    #[test]
    fn concurrent_initialisation_agrees() {
        let reg = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || *reg.initialize())
            })
            .collect();
        let hubs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(hubs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn transforms_through_hub() {
        let reg = registry();
        let to_utm = reg.transform_from_wgs84("EPSG:32630").unwrap();
        assert_eq!(to_utm.source(), CoordinateSystem::Wgs84);
        assert_eq!(to_utm.target(), CoordinateSystem::Utm { zone: 30, north: true });

        let back = reg.transform_to_wgs84(CoordinateSystem::WebMercator);
        assert_eq!(back.target(), CoordinateSystem::Wgs84);

        let err = reg.transform_from_wgs84("EPSG:1").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn load_link_imports_whole_file_once() {
        let reg = registry();
        let north = ShapefileLink::new("data/regions.shp", "Regions", "NAME", "North");
        let south = ShapefileLink::new("data/regions.shp", "regions", "name", " south ");

        assert_eq!(*reg.load_link(&north).unwrap().unwrap(), square(0.0, 10.0));
        assert_eq!(*reg.load_link(&south).unwrap().unwrap(), square(0.0, -10.0));
        assert_eq!(reg.importer().link_imports(), 1);

        // Everything but the feature without geometry is cached.
        assert_eq!(reg.geometry_cache().len(), 3);
    }

    #[test]
    fn load_link_miss_is_none() {
        let reg = registry();
        let nowhere = ShapefileLink::new("regions.shp", "regions", "name", "nowhere");
        assert!(reg.load_link(&nowhere).unwrap().is_none());

        let absent = ShapefileLink::new("regions.shp", "regions", "name", "east");
        assert!(reg.load_link(&absent).unwrap().is_none());
    }

    #[test]
    fn load_link_returns_empty_geometry() {
        let reg = registry();
        let blank = ShapefileLink::new("regions.shp", "regions", "name", "blank");
        let g = reg.load_link(&blank).unwrap().expect("empty geometry is still a geometry");
        assert_eq!(rc_core::vertex_count(&g), 0);
        assert!(reg.geometry_cache().contains(&blank));
    }

    #[test]
    fn load_link_does_not_overwrite_cached_links() {
        let reg = registry();
        let north = ShapefileLink::new("regions.shp", "regions", "name", "north");
        reg.geometry_cache().put(north.clone(), square(7.0, 7.0), 64);

        let south = ShapefileLink::new("regions.shp", "regions", "name", "south");
        assert!(reg.load_link(&south).unwrap().is_some());
        assert_eq!(*reg.load_link(&north).unwrap().unwrap(), square(7.0, 7.0));
    }

    #[test]
    fn import_failure_propagates() {
        let reg = registry();
        let link = ShapefileLink::new("missing.shp", "regions", "name", "north");
        assert!(reg.load_link(&link).is_err());
        assert!(reg.lookup_shapefile(Path::new("missing.shp"), "north", "regions", "name").is_err());
    }

    #[test]
    fn lookup_returns_first_match_and_caches_dataset() {
        let reg = registry();
        let file = Path::new("regions.shp");

        let g = reg.lookup_shapefile(file, "north", "REGIONS", "Name").unwrap().unwrap();
        assert_eq!(*g, square(0.0, 10.0));
        let g = reg.lookup_shapefile(file, "South", "regions", "name").unwrap().unwrap();
        assert_eq!(*g, square(0.0, -10.0));

        assert_eq!(reg.importer().dataset_imports(), 1);
        assert_eq!(reg.dataset_cache().len(), 1);
    }

    #[test]
    fn lookup_misses_are_none() {
        let reg = registry();
        let file = Path::new("regions.shp");
        assert!(reg.lookup_shapefile(file, "east", "regions", "name").unwrap().is_none());
        assert!(reg.lookup_shapefile(file, "north", "rivers", "name").unwrap().is_none());
        assert!(reg.lookup_shapefile(file, "north", "regions", "code").unwrap().is_none());
    }

    #[test]
    fn empty_dataset_is_not_cached() {
        let importer = FakeImporter { empty_dataset: true, ..Default::default() };
        let reg = CoordinateSystemRegistry::new(importer, MB, MB);
        let file = Path::new("regions.shp");

        assert!(reg.lookup_shapefile(file, "north", "regions", "name").unwrap().is_none());
        assert!(reg.lookup_shapefile(file, "north", "regions", "name").unwrap().is_none());
        assert_eq!(reg.importer().dataset_imports(), 2);
        assert!(reg.dataset_cache().is_empty());
    }

    #[test]
    fn without_importer_every_lookup_fails() {
        let reg = CoordinateSystemRegistry::new(crate::NoShapefileSupport, MB, MB);
        let link = ShapefileLink::new("regions.shp", "regions", "name", "north");
        assert!(matches!(reg.load_link(&link), Err(crate::CrsError::Import { .. })));
        assert!(reg.lookup_shapefile(Path::new("regions.shp"), "north", "regions", "name").is_err());
    }
}
