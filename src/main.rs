use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use log::info;
use semantic_core::{
    analyzer::analyzer::{analyze, AnalyzerOptions},
    display_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Checks and folds a program tree written in tree notation",
    long_about = None
)]
struct Cli {
    /// Tree notation file holding one `program` tree
    file: PathBuf,

    /// Print the tree as read, before analysis
    #[arg(long)]
    print_tree: bool,

    /// Stop at the first error
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.to_string_lossy().into_owned());

    let file_contents = match read_to_string(&cli.file) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", cli.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let tokens = match tokenize(file_contents.clone(), Some(file_name)) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &cli.file, &file_contents, None);
            return ExitCode::FAILURE;
        }
    };
    let (mut ast, root) = match parse(tokens) {
        Ok(tree) => tree,
        Err(error) => {
            display_error(&error, &cli.file, &file_contents, None);
            return ExitCode::FAILURE;
        }
    };
    info!("read {} nodes in {:?}", ast.len(), start.elapsed());

    if cli.print_tree {
        print!("{}", ast.print_tree(root));
    }

    let analyze_start = Instant::now();
    let options = AnalyzerOptions {
        fail_fast: cli.fail_fast,
    };
    let analysis = analyze(&mut ast, root, &options);
    info!("analysed in {:?}", analyze_start.elapsed());

    for error in analysis.errors.iter() {
        display_error(error, &cli.file, &file_contents, Some(&ast));
    }

    println!("{}", ast.to_notation(root));
    println!(
        "Variables: {}",
        analysis.table.count_variables(analysis.table.root(), true)
    );

    if analysis.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
