use indexmap::{IndexMap, IndexSet};
use proptest::prelude::*;
use std::cmp::Ordering;
use tablestate::*;

fn schema() -> Schema<Record> {
    Schema::new(vec![
        Column::field("seq", "Seq").data_type(DataType::Number),
        Column::field("key", "Key").data_type(DataType::Number),
        Column::field("name", "Name"),
        Column::field("note", "Note"),
    ])
    .unwrap()
}

/// Sort keys of every shape a column can hold, with cross-shape ties.
fn key_strategy() -> impl Strategy<Value = tablestate::Value> {
    prop_oneof![
        Just(tablestate::Value::Null),
        (0i64..4).prop_map(tablestate::Value::from),
        (0i64..4).prop_map(|n| tablestate::Value::Float(n as f64)),
        (-4.0f64..4.0).prop_map(tablestate::Value::Float),
        Just(tablestate::Value::Float(f64::NAN)),
        Just(tablestate::Value::Float(-0.0)),
        (0i64..12).prop_map(|n| tablestate::Value::from(n.to_string())),
        (1u32..4).prop_map(|d| tablestate::Value::from(parse_date(&format!("2024-01-0{}", d)))),
        any::<bool>().prop_map(tablestate::Value::from),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (
            key_strategy(),
            "[a-dA-D]{0,3}",
            "[a-z ,\"]{0,10}",
        ),
        0..24,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(seq, (key, name, note))| {
                Record::new()
                    .set("seq", seq as i64)
                    .set("key", key)
                    .set("name", name)
                    .set("note", note)
            })
            .collect()
    })
}

fn seqs(rows: &[&Record]) -> Vec<i64> {
    rows.iter().filter_map(|r| r.value("seq").as_i64()).collect()
}

proptest! {
    #[test]
    fn sort_is_idempotent_and_stable(rows in rows_strategy(), desc in any::<bool>()) {
        let schema = schema();
        let criteria = vec![SortCriterion::new("key", desc)];

        let once = sort::sort(&rows, &criteria, &schema);
        let owned: Vec<Record> = once.iter().map(|r| (*r).clone()).collect();
        let twice = sort::sort(&owned, &criteria, &schema);
        prop_assert_eq!(seqs(&once), seqs(&twice));

        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        for pair in once.windows(2) {
            let (a, b) = (pair[0].value("key"), pair[1].value("key"));
            // Nulls last in both directions
            prop_assert!(!(a.is_null() && !b.is_null()));
            let ordering = sort::compare_values(&a, &b, direction);
            prop_assert_ne!(ordering, Ordering::Greater);
            if ordering == Ordering::Equal {
                prop_assert!(pair[0].value("seq").as_i64() < pair[1].value("seq").as_i64());
            }
        }
    }

    #[test]
    fn numeric_keys_sort_by_value(keys in prop::collection::vec(prop::option::of(0i64..4), 0..24), desc in any::<bool>()) {
        let rows: Vec<Record> = keys
            .iter()
            .enumerate()
            .map(|(seq, key)| Record::new().set("seq", seq as i64).set("key", *key))
            .collect();
        let sorted = sort::sort(&rows, &[SortCriterion::new("key", desc)], &schema());
        for pair in sorted.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].value("key").as_i64(), pair[1].value("key").as_i64()) {
                let ordered = if desc { a >= b } else { a <= b };
                prop_assert!(ordered);
            }
        }
    }

    #[test]
    fn filters_compose_with_and(rows in rows_strategy(), min in 0i64..4, letter in "[a-d]") {
        let schema = schema();
        let options = FilterOptions::default();
        let a = ("key".to_string(), FilterSpec::number(CompareOperator::Gte, min as f64));
        let b = ("name".to_string(), FilterSpec::text(TextOperator::Contains, letter));

        let both: IndexMap<String, FilterSpec> = [a.clone(), b.clone()].into_iter().collect();
        let only_a: IndexMap<String, FilterSpec> = [a].into_iter().collect();
        let only_b: IndexMap<String, FilterSpec> = [b].into_iter().collect();

        let combined = filter::filter(&rows, &both, &schema, &options);
        let first: Vec<Record> = filter::filter(&rows, &only_a, &schema, &options)
            .into_iter()
            .cloned()
            .collect();
        let chained = filter::filter(&first, &only_b, &schema, &options);
        prop_assert_eq!(seqs(&combined), seqs(&chained));
    }

    #[test]
    fn empty_search_is_identity(rows in rows_strategy()) {
        let schema = schema();
        let found = search::search(&rows, "", &[], &schema, false);
        let all: Vec<&Record> = rows.iter().collect();
        prop_assert_eq!(seqs(&found), seqs(&all));
    }

    #[test]
    fn toggle_twice_restores_visibility(column in prop::sample::select(vec!["seq", "key", "name", "note", "other"])) {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        let before = visibility.clone();
        visibility.toggle(column);
        visibility.toggle(column);
        prop_assert_eq!(visibility, before);
    }

    #[test]
    fn csv_round_trips_visible_values(rows in rows_strategy()) {
        let schema = schema();
        let columns: Vec<&Column<Record>> = ["name", "note"].iter().filter_map(|id| schema.get(id)).collect();
        let refs: Vec<&Record> = rows.iter().collect();
        let csv = export::to_csv(&refs, &columns).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        prop_assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Name", "Note"]);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = rows
            .iter()
            .map(|r| vec![r.value("name").to_string(), r.value("note").to_string()])
            .collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn expansion_ids_round_trip(ids in prop::collection::vec("[a-z0-9,% &=]{1,8}", 0..8)) {
        let unique: IndexSet<String> = ids.into_iter().collect();
        let serialized = serialize_ids(unique.iter().map(String::as_str));
        prop_assert_eq!(serialized.is_none(), unique.is_empty());

        let restored = deserialize_ids(serialized.as_deref());
        prop_assert_eq!(restored.into_iter().collect::<Vec<_>>(), unique.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn smith_joe_round_trips_through_csv() {
    let schema = schema();
    let rows = vec![Record::new().set("name", "Smith, \"Joe\"").set("note", "")];
    let refs: Vec<&Record> = rows.iter().collect();
    let columns: Vec<&Column<Record>> = vec![schema.get("name").unwrap()];
    let csv = export::to_csv(&refs, &columns).unwrap();
    assert_eq!(csv, "Name\n\"Smith, \"\"Joe\"\"\"\n");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "Smith, \"Joe\"");
}

#[test]
fn expanded_pair_round_trips() {
    let serialized = serialize_ids(["7", "12"]);
    assert_eq!(serialized.as_deref(), Some("7,12"));
    let restored: Vec<String> = deserialize_ids(serialized.as_deref()).into_iter().collect();
    assert_eq!(restored, vec!["7", "12"]);
}
