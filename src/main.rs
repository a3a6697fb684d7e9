use anyhow::{Context, Result, bail};
use tracing::info;

use geotex::{Scene, logs, parser, tokeniser};

fn main() -> Result<()> {
    logs::init_tracing();

    let mut args = std::env::args();
    match args.nth(1) {
        None => bail!("Path to a document required as an argument."),
        Some(path) => {
            let document = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read document at {path}"))?;

            let tokens = tokeniser::tokenise(&document);

            let statements = parser::parse(&tokens)
                .with_context(|| format!("Failed to parse document at {path}"))?;

            let scene = Scene::from_statements(statements);
            info!(
                constructions = scene.constructions.len(),
                statements = scene.statements.len(),
                "assembled scene"
            );

            print!("{scene}");
        }
    }

    Ok(())
}
