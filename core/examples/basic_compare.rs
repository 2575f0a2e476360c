use std::fs::File;
use std::io::BufReader;
use tabular_diff::{ComparisonOptions, Dataset, compare};

fn usage() -> ! {
    eprintln!("Usage: basic_compare <OLD.json> <NEW.json> [OPTIONS.json]");
    eprintln!("  Datasets are JSON objects: {{\"rows\": [[{{\"type\": \"text\", \"value\": \"a\"}}]]}}");
    std::process::exit(2);
}

fn load<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let old_path = args.next().unwrap_or_else(|| usage());
    let new_path = args.next().unwrap_or_else(|| usage());

    let original: Dataset = load(&old_path)?;
    let modified: Dataset = load(&new_path)?;
    let options = match args.next() {
        Some(path) => {
            let options: ComparisonOptions = load(&path)?;
            options.validate()?;
            options
        }
        None => ComparisonOptions::default(),
    };

    let result = compare(&original, &modified, &options);
    let summary = &result.summary;
    println!("strategy: {}", result.strategy.as_str());
    println!(
        "rows: {} added, {} removed, {} modified, {} unchanged",
        summary.added_rows, summary.removed_rows, summary.modified_rows, summary.unchanged_rows
    );
    println!("modified cells: {}", summary.modified_cells);

    let view = result.view(&options);
    for &row in &view.rows {
        println!("{:?} {:?} -> {:?}", row.kind, row.original_index, row.modified_index);
        for cell in view.cells(row).filter(|c| c.change.is_change()) {
            println!("  col {}: {:?}", cell.column, cell.change);
        }
    }

    Ok(())
}
