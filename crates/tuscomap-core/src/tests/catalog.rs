use crate::catalog::{
    canonical_dataset_name, dataset_file_name, dataset_href, dataset_slug_from_file_name,
    tissue_name_from_header,
};
use crate::*;

fn entry(name: &str, file: &str) -> TissueEntry {
    TissueEntry {
        tissue_name: name.to_string(),
        uberon_id: None,
        file_name: file.to_string(),
        size_bytes: 0,
    }
}

#[test]
fn available_slugs_come_from_conforming_file_names_only() {
    let catalog = Catalog::from_entries(
        Species::Human,
        vec![
            entry("Liver", "tusco_human_liver.tsv"),
            entry("Kidney", "tusco_human_kidney.tsv"),
            // Wrong species prefix, legacy name, bulk file: none contribute.
            entry("Brain", "tusco_mouse_brain.tsv"),
            entry("Lung", "UBERON:0002048.tsv"),
            entry("All", "tusco_human.tsv"),
        ],
    );

    let available = catalog.available_slugs();
    assert_eq!(available.len(), 2);
    assert!(available.contains("liver"));
    assert!(available.contains("kidney"));
}

#[test]
fn alias_seeding_skips_identity_mappings_and_keeps_first_on_conflict() {
    let catalog = Catalog::from_entries(
        Species::Human,
        vec![
            // Display name slugs to "liver" already; no alias needed.
            entry("Liver", "tusco_human_liver.tsv"),
            // Display name differs from the file slug; alias seeded.
            entry("Skeletal Muscle", "tusco_human_muscle.tsv"),
            // Conflicting display name: first entry wins.
            entry("Skeletal Muscle", "tusco_human_muscle_leg.tsv"),
        ],
    );

    let aliases = catalog.aliases();
    assert_eq!(aliases.len(), 1);
    assert_eq!(
        aliases.get("skeletal muscle").map(String::as_str),
        Some("muscle")
    );
}

#[test]
fn alias_overrides_win_over_seeds() {
    let catalog = Catalog::from_entries(
        Species::Mouse,
        vec![entry("Skeletal Muscle", "tusco_mouse_muscle.tsv")],
    )
    .with_aliases([("Skeletal Muscle".to_string(), "muscle_leg".to_string())]);

    assert_eq!(
        catalog.aliases().get("skeletal muscle").map(String::as_str),
        Some("muscle_leg")
    );
}

#[test]
fn catalog_parses_the_listing_response_shape() {
    let text = r#"[
        { "tissueName": "Liver", "uberonId": "UBERON:0002107", "filename": "tusco_human_liver.tsv", "size": 1048576 },
        { "tissueName": "Heart", "filename": "tusco_human_heart.tsv" }
    ]"#;
    let catalog = Catalog::from_json(Species::Human, text).unwrap();
    assert_eq!(catalog.entries().len(), 2);
    assert_eq!(catalog.entries()[0].uberon_id.as_deref(), Some("UBERON:0002107"));
    assert_eq!(catalog.entries()[0].size_bytes, 1048576);
    assert!(catalog.available_slugs().contains("heart"));

    let err = Catalog::from_json(Species::Human, "{ not json").unwrap_err();
    assert!(matches!(err, Error::CatalogJson(_)));
}

#[test]
fn dataset_naming_round_trips() {
    assert_eq!(dataset_file_name(Species::Human, "kidney"), "tusco_human_kidney.tsv");
    assert_eq!(
        dataset_href(Species::Mouse, "heart_left_ventricle"),
        "/data/mouse/tusco_mouse_heart_left_ventricle.tsv"
    );
    assert_eq!(
        dataset_slug_from_file_name(Species::Human, "tusco_human_adrenal_gland.tsv"),
        Some("adrenal_gland")
    );
    assert_eq!(dataset_slug_from_file_name(Species::Human, "tusco_human_.tsv"), None);
    assert_eq!(dataset_slug_from_file_name(Species::Human, "notes.txt"), None);
}

#[test]
fn species_parses_and_displays() {
    assert_eq!("human".parse::<Species>().unwrap(), Species::Human);
    assert_eq!(" Mouse ".parse::<Species>().unwrap(), Species::Mouse);
    assert_eq!(Species::Human.to_string(), "human");

    let err = "rat".parse::<Species>().unwrap_err();
    assert!(matches!(err, Error::UnknownSpecies { name } if name == "rat"));
}

#[test]
fn header_line_recovers_the_tissue_name() {
    let line = "# Gene IDs passing expressed in Adrenal Gland (UBERON:0002369) filter";
    assert_eq!(tissue_name_from_header(line).as_deref(), Some("Adrenal Gland"));
    assert_eq!(
        canonical_dataset_name(Species::Human, line).as_deref(),
        Some("tusco_human_adrenal_gland.tsv")
    );

    assert_eq!(tissue_name_from_header("# unrelated header"), None);
    assert_eq!(canonical_dataset_name(Species::Human, "gene_id\tcount"), None);
}
