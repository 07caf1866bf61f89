//! Fixtures shared by the unit tests: GeoPackage files, SLD documents and
//! tenant config trees in temporary directories.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde_json::json;

/// SLD with one `ElseFilter` rule filled `#00ff00`.
pub(crate) const ELSE_FILTER_SLD: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<StyledLayerDescriptor version="1.1.0" xmlns="http://www.opengis.net/sld"
    xmlns:ogc="http://www.opengis.net/ogc" xmlns:se="http://www.opengis.net/se">
  <NamedLayer>
    <se:Name>buildings</se:Name>
    <UserStyle>
      <se:FeatureTypeStyle>
        <se:Rule>
          <se:Name>all</se:Name>
          <se:ElseFilter/>
          <se:PolygonSymbolizer>
            <se:Fill><se:SvgParameter name="fill">#00ff00</se:SvgParameter></se:Fill>
          </se:PolygonSymbolizer>
        </se:Rule>
      </se:FeatureTypeStyle>
    </UserStyle>
  </NamedLayer>
</StyledLayerDescriptor>"##;

/// Writes a minimal GeoPackage with a `buildings` feature layer and a
/// `layer_styles` table holding [`ELSE_FILTER_SLD`].
pub(crate) fn buildings_gpkg(dir: &Path) -> PathBuf {
    let path = dir.join("buildings.gpkg");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r"
        CREATE TABLE gpkg_contents (
            table_name TEXT NOT NULL PRIMARY KEY,
            data_type TEXT NOT NULL
        );
        CREATE TABLE gpkg_geometry_columns (
            table_name TEXT NOT NULL,
            column_name TEXT NOT NULL
        );
        CREATE TABLE buildings (
            fid INTEGER PRIMARY KEY AUTOINCREMENT,
            geom BLOB,
            gml_id TEXT,
            description TEXT,
            function TEXT,
            height REAL,
            storeys INTEGER
        );
        CREATE TABLE layer_styles (f_table_name TEXT, stylename TEXT, styleSLD TEXT);
        INSERT INTO gpkg_contents VALUES ('buildings', 'features');
        INSERT INTO gpkg_geometry_columns VALUES ('buildings', 'geom');
        INSERT INTO buildings (geom, gml_id, description, function, height, storeys)
            VALUES (x'00', 'DEHE06200002zcog', 'Wohnhaus', '31001_1000', 9.5, 3);
        INSERT INTO buildings (geom, gml_id, description, function, height, storeys)
            VALUES (x'00', 'DEHE06200002abcd', 'Garage', NULL, 2.75, 1);
        ",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO layer_styles VALUES ('buildings', 'default', ?1)",
        [ELSE_FILTER_SLD],
    )
    .unwrap();
    path
}

/// Writes `<dir>/<tenant>/tileinfoConfig.json` configuring a `buildings`
/// GeoPackage dataset with a file style, a query style and a broken style.
pub(crate) fn tenant_config(dir: &Path, tenant: &str) -> PathBuf {
    let gpkg = buildings_gpkg(dir);
    let sld = dir.join("buildings.sld");
    std::fs::write(&sld, ELSE_FILTER_SLD).unwrap();

    let config = json!({
        "$schema": "https://example.org/schemas/qwc-tileinfo-service.json",
        "service": "tileinfo",
        "config": {
            "info_datasets": {
                "buildings": {
                    "type": "gpkg",
                    "dataset": gpkg,
                    "layername": "buildings",
                    "idfield": "gml_id",
                    "attribute_aliases": {
                        "description": "Beschreibung",
                        "function": "Gebäudefunktion"
                    },
                    "attribute_blacklist": ["gml_id"],
                    "styles": {
                        "default": {"filename": sld},
                        "fromdb": {
                            "query": "SELECT styleSLD FROM layer_styles WHERE stylename = 'default'"
                        },
                        "broken": {"filename": dir.join("missing.sld")}
                    }
                },
                "legacy": {
                    "type": "shapefile",
                    "dataset": "/data/legacy.shp",
                    "idfield": "id"
                }
            }
        }
    });

    let tenant_dir = dir.join(tenant);
    std::fs::create_dir_all(&tenant_dir).unwrap();
    std::fs::write(
        tenant_dir.join("tileinfoConfig.json"),
        serde_json::to_vec_pretty(&config).unwrap(),
    )
    .unwrap();
    dir.to_path_buf()
}
