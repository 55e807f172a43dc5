//! Unit tests for gv-cache.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use geo_types::{line_string, polygon, Geometry};

    use gv_core::{AttrValue, Crs, Feature, FeatureTable};

    pub fn sample_table() -> FeatureTable {
        let mut t = FeatureTable::new(Crs::PLATEAU_DELIVERY);

        let mut attrs = BTreeMap::new();
        attrs.insert("usage".to_string(), AttrValue::Text("house".to_string()));
        attrs.insert("height".to_string(), AttrValue::Number(9.75));
        t.push(Feature {
            geometry: Geometry::Polygon(polygon![
                (x: 138.0, y: 35.0),
                (x: 138.001, y: 35.0),
                (x: 138.001, y: 35.001),
                (x: 138.0, y: 35.001),
            ]),
            attributes: attrs,
        });

        let mut attrs = BTreeMap::new();
        attrs.insert("height".to_string(), AttrValue::Null);
        t.push(Feature {
            geometry: Geometry::LineString(line_string![
                (x: 138.0, y: 35.0),
                (x: 138.02, y: 35.01),
            ]),
            attributes: attrs,
        });

        t
    }
}

// ── Store round-trip ──────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use crate::CacheStore;

    use super::helpers::sample_table;

    #[test]
    fn roundtrip_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let table = sample_table();

        store.save("buildings_cache.pkl", &table).unwrap();
        let loaded = store.load("buildings_cache.pkl").unwrap().unwrap();

        // Geometry, attributes, column list, and CRS tag all survive.
        assert_eq!(loaded, table);
    }

    #[test]
    fn absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(store.load("roads_cache.pkl").unwrap().is_none());
        assert!(!store.contains("roads_cache.pkl"));
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let table = sample_table();

        store.save("k.pkl", &table).unwrap();
        let smaller = gv_core::FeatureTable::from_parts(
            vec![table.features()[0].clone()],
            table.crs(),
            table.columns().to_vec(),
        );
        store.save("k.pkl", &smaller).unwrap();

        assert_eq!(store.load("k.pkl").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn creates_store_directory_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested/cache"));
        store.save("k.pkl", &sample_table()).unwrap();
        assert!(store.contains("k.pkl"));
    }
}

// ── Keys ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod keys {
    use geo_types::{coord, Rect};

    use crate::{bbox_key, BUILDINGS_KEY, ROADS_KEY};

    #[test]
    fn bbox_key_formats_to_four_decimals() {
        let bounds = Rect::new(
            coord! { x: 139.1234, y: 35.5678 },
            coord! { x: 139.9999, y: 35.9999 },
        );
        assert_eq!(
            bbox_key(&bounds),
            "bldg_merged_LL_139.1234_35.5678_UR_139.9999_35.9999.pkl"
        );
    }

    #[test]
    fn bbox_key_rounds() {
        let bounds = Rect::new(
            coord! { x: 139.123449, y: 35.0 },
            coord! { x: 139.2, y: 36.0 },
        );
        assert_eq!(
            bbox_key(&bounds),
            "bldg_merged_LL_139.1234_35.0000_UR_139.2000_36.0000.pkl"
        );
    }

    #[test]
    fn identical_extents_collide() {
        let a = Rect::new(coord! { x: 1.0, y: 2.0 }, coord! { x: 3.0, y: 4.0 });
        let b = Rect::new(coord! { x: 1.0, y: 2.0 }, coord! { x: 3.0, y: 4.0 });
        assert_eq!(bbox_key(&a), bbox_key(&b));
    }

    #[test]
    fn fixed_key_names_are_stable() {
        assert_eq!(BUILDINGS_KEY, "buildings_cache.pkl");
        assert_eq!(ROADS_KEY, "roads_cache.pkl");
    }
}
