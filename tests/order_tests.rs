use cutplan::demand::{aggregate, aggregate_with_report};
use cutplan::order::Order;
use std::io::Cursor;
use std::io::Write;

const LEGACY_ORDER: &str = r#"{
  "urunler": [
    {
      "hesaplananGereksinimler": {
        "profiller": [
          {
            "profil_id": 12,
            "profil": { "profil_isim": "Kasa 60", "boy_uzunluk": 6000, "birim_agirlik": 1.25 },
            "hesaplanan_degerler": { "kesim_olcusu": 1200, "kesim_adedi": 4 }
          },
          {
            "profil_id": "12",
            "profil": { "profil_isim": "Kasa 60", "boy_uzunluk": "6000" },
            "hesaplanan_degerler": { "kesim_olcusu": "850,5", "kesim_adedi": "2" }
          }
        ]
      }
    },
    {
      "hesaplananGereksinimler": {
        "profiller": [
          {
            "profil_id": 12,
            "profil": { "profil_isim": "Kasa 60", "boy_uzunluk": 6000 },
            "hesaplanan_degerler": { "kesim_olcusu": 1200, "kesim_adedi": 1 }
          },
          {
            "profil_id": 30,
            "profil": { "profil_isim": "Kanat", "boy_uzunluk": 6500, "boyali": true },
            "hesaplanan_degerler": { "kesim_olcusu": 700, "kesim_adedi": 3 }
          }
        ]
      }
    }
  ]
}"#;

#[test]
fn test_legacy_document_aggregates_across_products() {
    let order = Order::from_json_str(LEGACY_ORDER).unwrap();
    let requests = aggregate(&order);

    assert_eq!(requests.len(), 2);

    let kasa = &requests[0];
    assert_eq!(kasa.profile.id, "12");
    assert_eq!(kasa.profile.name, "Kasa 60");
    assert_eq!(kasa.profile.stock_length_mm, 6000.0);
    assert_eq!(kasa.profile.unit_weight_kg_m, 1.25);
    assert!(!kasa.profile.painted);
    // 1200 x 4 and 1200 x 1 merge; 850.5 x 2 stays separate.
    assert_eq!(kasa.pieces.len(), 2);
    assert_eq!(kasa.pieces[0].length_mm, 1200.0);
    assert_eq!(kasa.pieces[0].count, 5);
    assert_eq!(kasa.pieces[1].length_mm, 850.5);
    assert_eq!(kasa.pieces[1].count, 2);

    let kanat = &requests[1];
    assert!(kanat.profile.painted, "paint flag falls back to profile meta");
    assert_eq!(kanat.piece_count(), 3);
}

#[test]
fn test_malformed_values_become_zero() {
    let doc = r#"{
      "urunler": [
        { "hesaplananGereksinimler": { "profiller": [
          { "profil_id": 1, "profil": { "boy_uzunluk": 6000 },
            "hesaplanan_degerler": { "kesim_olcusu": "abc", "kesim_adedi": 3 } },
          { "profil_id": 1, "profil": { "boy_uzunluk": 6000 },
            "hesaplanan_degerler": { "kesim_olcusu": 900, "kesim_adedi": null } },
          { "profil_id": 1, "profil": null,
            "hesaplanan_degerler": { "kesim_olcusu": -400, "kesim_adedi": 2 } },
          { "profil": { "boy_uzunluk": 6000 },
            "hesaplanan_degerler": { "kesim_olcusu": 500, "kesim_adedi": 1 } },
          null,
          42
        ] } },
        { "hesaplananGereksinimler": null },
        {}
      ]
    }"#;

    let order = Order::from_json_str(doc).unwrap();
    let (requests, report) = aggregate_with_report(&order);

    assert_eq!(report.lines_seen, 4);
    assert_eq!(report.lines_without_id, 1);
    assert_eq!(report.lines_zeroed, 3);

    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_empty());
    assert_eq!(requests[0].profile.name, "1", "name falls back to id");
}

#[test]
fn test_missing_top_level_fields() {
    assert!(aggregate(&Order::from_json_str("{}").unwrap()).is_empty());
    assert!(aggregate(&Order::from_json_str(r#"{"urunler": null}"#).unwrap()).is_empty());
    assert!(aggregate(&Order::from_json_str(r#"{"urunler": "x"}"#).unwrap()).is_empty());
}

#[test]
fn test_broken_json_is_an_error() {
    assert!(Order::from_json_str("{ not json").is_err());
}

#[test]
fn test_csv_rows() {
    let data = "\
profil_id,profil_isim,boy_uzunluk,birim_agirlik,kesim_olcusu,kesim_adedi,boyali
K1,Kasa,6000,1.1,1500,2,hayir
K1,Kasa,6000,1.1,1500,1,
K2,Kanat,6500,,\"720,5\",4,evet
K3,Esik,,,300,x,
";
    let order = Order::from_csv_reader(Cursor::new(data)).unwrap();
    let requests = aggregate(&order);

    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].pieces[0].count, 3);
    assert!(requests[1].profile.painted);
    assert_eq!(requests[1].pieces[0].length_mm, 720.5);
    assert_eq!(requests[1].profile.unit_weight_kg_m, 0.0);
    assert!(requests[2].is_empty());
    assert_eq!(requests[2].profile.stock_length_mm, 0.0);
}

#[test]
fn test_csv_from_file_with_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "profil_id,kesim_olcusu,kesim_adedi,boy_uzunluk").unwrap();
    writeln!(f, "P9,1000,2,6000").unwrap();
    drop(f);

    let order = Order::load_csv(&path).unwrap();
    let requests = aggregate(&order);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].profile.name, "P9");
    assert_eq!(requests[0].piece_count(), 2);
}

#[test]
fn test_json_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.json");
    std::fs::write(&path, LEGACY_ORDER).unwrap();

    let order = Order::load_from_file(&path).unwrap();
    let again = Order::from_json_str(&serde_json::to_string(&order).unwrap()).unwrap();
    assert_eq!(aggregate(&order), aggregate(&again));
}
