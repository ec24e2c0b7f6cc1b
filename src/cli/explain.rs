use std::error::Error;
use std::sync::Arc;

use jsondiff_schema::aggregator::ExplainerKind;
use jsondiff_schema::facade::{Patcher, PatcherConfig};
use jsondiff_schema::path::Spath;
use jsondiff_schema::schema::{Planner, PlannerOptions};

use crate::cli::{read::load_json_file, ExplainArgs};

pub fn handle_explain_command(args: ExplainArgs) -> Result<(), Box<dyn Error>> {
    let doc1_text = std::fs::read_to_string(&args.file1)?;
    let doc2_text = std::fs::read_to_string(&args.file2)?;

    let schema = match &args.schema {
        Some(schema_path) => load_json_file(schema_path)?,
        None => serde_json::json!({}),
    };
    let plan = Arc::new(Planner::new(PlannerOptions::default()).build(&schema));

    let partial_diff_keys = args
        .partial_keys
        .iter()
        .map(|raw| Spath::try_from(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let config = PatcherConfig::builder()
        .explainer(ExplainerKind::Default)
        .partial_diff_keys(partial_diff_keys)
        .build();

    let patcher = Patcher::new(plan, config);
    let result = patcher.diff(&doc1_text, &doc2_text)?;

    for formatted in result {
        println!("{}", formatted.explanation);
    }
    Ok(())
}
