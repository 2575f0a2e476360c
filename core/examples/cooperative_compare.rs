use tabular_diff::{ComparisonOptions, Dataset, RequestTokens, YieldFn, compare_cooperative};

fn synthetic(rows: usize, edit_every: usize) -> Dataset {
    Dataset::from_values((0..rows).map(|i| {
        let status = if edit_every > 0 && i % edit_every == 0 { "closed" } else { "open" };
        vec![format!("T-{i:04}"), format!("ticket {i}"), status.to_string()]
    }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tokens = RequestTokens::new();
    let options = ComparisonOptions::builder()
        .solver_checkpoint_interval(25)
        .row_checkpoint_interval(50)
        .build()?;

    let original = synthetic(300, 0);
    let first_edit = synthetic(300, 10);
    let second_edit = synthetic(300, 3);

    let progress = |phase: &str, percent: f32| eprintln!("{phase}: {:>5.1}%", percent * 100.0);

    let first = tokens.begin();
    let second = tokens.begin();
    let (a, b) = tokio::join!(
        compare_cooperative(&original, &first_edit, &options, YieldFn(tokio::task::yield_now), None),
        compare_cooperative(
            &original,
            &second_edit,
            &options,
            YieldFn(tokio::task::yield_now),
            Some(&progress),
        ),
    );

    if tokens.publish(first, a).is_none() {
        println!("first comparison superseded");
    }
    if let Some(result) = tokens.publish(second, b) {
        println!("modified rows: {}", result.summary.modified_rows);
    }
    Ok(())
}
