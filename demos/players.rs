/// Players Table Example
///
/// This example demonstrates:
/// - Declaring a column schema over a typed row struct
/// - Searching, filtering and multi-column sorting
/// - Hiding columns and exporting the processed rows
/// - Card layout tiers and expandable rows kept in a query string

use tablestate::{
    classify, Breakpoint, Column, CompareOperator, DataType, ExpansionOptions, ExpansionState,
    ExportFormat, FilterSpec, QueryParams, ResponsivePriority, Schema, TableOptions, TableState,
    TextOperator, Value,
};

struct Player {
    id: u32,
    name: &'static str,
    team: &'static str,
    position: &'static str,
    goals: u32,
}

fn main() {
    println!("=== TableState Players Example ===\n");

    // 1. Declare the columns
    println!("1. Creating schema...");
    let schema = Schema::new(vec![
        Column::new("id", "ID", |p: &Player| Value::from(p.id))
            .data_type(DataType::Number)
            .visible_by_default(false),
        Column::new("name", "Name", |p: &Player| Value::from(p.name))
            .responsive_priority(ResponsivePriority::High),
        Column::new("team", "Team", |p: &Player| Value::from(p.team))
            .responsive_priority(ResponsivePriority::Medium),
        Column::new("position", "Position", |p: &Player| Value::from(p.position))
            .responsive_priority(ResponsivePriority::Low),
        Column::new("goals", "Goals", |p: &Player| Value::from(p.goals))
            .data_type(DataType::Number)
            .responsive_priority(ResponsivePriority::Lowest),
    ])
    .expect("column ids are unique");
    println!("   Schema created with {} columns\n", schema.len());

    let players = vec![
        Player { id: 1, name: "Ana Souza", team: "Hawks", position: "Forward", goals: 14 },
        Player { id: 2, name: "Ben Carter", team: "Owls", position: "Defender", goals: 2 },
        Player { id: 3, name: "Chloe Park", team: "Hawks", position: "Midfield", goals: 9 },
        Player { id: 4, name: "Dan O'Neil", team: "Crows", position: "Forward", goals: 14 },
        Player { id: 5, name: "Eva Lind", team: "Owls", position: "Goalkeeper", goals: 0 },
    ];

    // 2. Build the table state
    println!("2. Creating table state...");
    let mut table = TableState::new(players, schema, TableOptions::default())
        .with_row_id(|p: &Player, _| p.id.to_string());
    println!("   {} rows, {} visible columns\n", table.total_rows(), table.visible_columns().len());

    // 3. Sort by goals, then name
    println!("3. Sorting by goals desc, name asc...");
    table.add_sort("goals", true);
    table.add_sort("name", false);
    for player in table.data() {
        println!("   {:<12} {:>3}", player.name, player.goals);
    }
    println!();

    // 4. Filter and search
    println!("4. Filtering goals >= 5 and searching 'a'...");
    table.update_filter("goals", FilterSpec::number(CompareOperator::Gte, 5.0));
    table.update_filter("position", FilterSpec::text(TextOperator::StartsWith, "f"));
    table.update_search("a");
    println!(
        "   {} of {} rows match (filtered: {})",
        table.filtered_rows(),
        table.total_rows(),
        table.is_filtered()
    );
    table.remove_filter("position");
    println!("   Without the position filter: {} rows\n", table.filtered_rows());

    // 5. Export
    println!("5. Exporting visible columns as CSV...");
    table.hide_column("position");
    match table.export_data(ExportFormat::Csv, "players") {
        Ok(payload) => {
            println!("   {} ({})", payload.filename, payload.mime_type());
            for line in payload.content.lines() {
                println!("   {}", line);
            }
        }
        Err(err) => println!("   Export failed: {}", err),
    }
    println!();

    // 6. Responsive tiers
    println!("6. Card layout...");
    let visible = table.visible_columns();
    let split = classify(&visible);
    for row in table.data() {
        let card = split.card(row);
        let primary: Vec<String> = card.primary.iter().map(|f| f.value.to_string()).collect();
        println!("   {} (+{} more)", primary.join(" / "), card.secondary.len());
    }
    for column in &visible {
        let disclosure = column.get_responsive_priority().disclosure();
        println!(
            "   {:<8} shown on small screens: {:<5} class: '{}'",
            column.id(),
            disclosure.shown_at(Some(Breakpoint::Small)),
            disclosure.class_hint()
        );
    }
    println!();

    // 7. Expanded rows and the location string
    println!("7. Persisting view state in the query string...");
    let mut location = QueryParams::parse("?page=1");
    table.write_query(&mut location);
    let mut expansion = ExpansionState::mount(&mut location, ExpansionOptions::persisted());
    for id in table.row_ids() {
        expansion.toggle(&id);
    }
    drop(expansion);
    println!("   ?{}", location);

    let restored = ExpansionState::mount(QueryParams::parse(&location.to_string()), ExpansionOptions::persisted());
    println!("   Restored {} expanded rows", restored.len());

    println!("\n=== Example completed successfully! ===");
}
