use super::*;

const SAMPLE: &str = r#"[
  {"id": 1, "year": 2023, "title": "Ancient genomes", "journal": "Nature",
   "authors": "A. B., C. D.", "category": "academic", "doi": "10.1000/xyz"},
  {"id": 2, "year": 2022, "title": "On trees", "journal": "Blog",
   "authors": "A. B.", "category": "non-academic", "link": "https://example.org/trees"},
  {"id": 3, "year": 2021, "title": "Admixture", "journal": "Genetics",
   "authors": "E. F.", "category": "academic"}
]"#;

#[test]
fn parses_and_filters_in_order() {
    let list = Publications::from_json_str(SAMPLE).unwrap();
    assert_eq!(list.len(), 3);
    let academic: Vec<u32> = list
        .filter(PublicationCategory::Academic)
        .map(|p| p.id)
        .collect();
    assert_eq!(academic, vec![1, 3]);
    let other: Vec<u32> = list
        .filter(PublicationCategory::NonAcademic)
        .map(|p| p.id)
        .collect();
    assert_eq!(other, vec![2]);
}

#[test]
fn href_prefers_doi() {
    let list = Publications::from_json_str(SAMPLE).unwrap();
    let hrefs: Vec<Option<String>> = list.iter().map(Publication::href).collect();
    assert_eq!(
        hrefs,
        vec![
            Some("https://doi.org/10.1000/xyz".to_string()),
            Some("https://example.org/trees".to_string()),
            None
        ]
    );
}

#[test]
fn category_uses_kebab_case() {
    let json = serde_json::to_string(&PublicationCategory::NonAcademic).unwrap();
    assert_eq!(json, r#""non-academic""#);
    assert!(
        Publications::from_json_str(
            r#"[{"id":1,"year":1,"title":"t","journal":"j","authors":"a","category":"Academic"}]"#
        )
        .is_err()
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let p = Publication {
        id: 7,
        year: 2020,
        title: "x".into(),
        journal: "y".into(),
        authors: "z".into(),
        category: PublicationCategory::Academic,
        doi: None,
        link: None,
    };
    let err = Publications::new(vec![p.clone(), p]).unwrap_err();
    assert!(err.to_string().contains("duplicate publication id 7"));
}

#[test]
fn empty_list_is_fine() {
    let list = Publications::from_json_str("[]").unwrap();
    assert!(list.is_empty());
}
