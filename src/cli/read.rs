use std::error::Error;
use std::io::Read;
use std::path::Path;

use jsondiff_schema::path::Spath;
use jsondiff_schema::resolve::resolve_ref;

use crate::cli::ReadArgs;

pub fn handle_read_command(args: ReadArgs) -> Result<(), Box<dyn Error>> {
    let json = if let Some(file_path) = args.file {
        load_json_file(&file_path)?
    } else {
        read_from_stdin()?
    };

    let path = Spath::try_from(args.path.as_str())?;
    let value = resolve_ref(&json, &path)?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn load_json_file(path: &Path) -> Result<serde_json::Value, Box<dyn Error>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn read_from_stdin() -> Result<serde_json::Value, Box<dyn Error>> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(serde_json::from_str(&buffer)?)
}
