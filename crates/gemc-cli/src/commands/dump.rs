//! `gemc dump` - run the full pipeline (analyser, node-expansion, memory
//! manager) and print the lowered IR as JSON.

use std::rc::Rc;

use gemc_compiler::ModuleLoader;

use crate::cli::{InputArgs, OptionsArgs};
use crate::util::{load_program, report_and_exit};

pub fn run(input: InputArgs, options: OptionsArgs) {
    let (program, source) = load_program(&input.path).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let colorize = input.color.should_colorize();
    let loader = Rc::new(ModuleLoader::minimal());

    let result = gemc_compiler::compile(&input.path, source.clone(), program, options.into_compile_options(), loader);

    let (program, _file) = match result {
        Ok(output) => output,
        Err(gemc_compiler::Error::Comptime(err)) => report_and_exit(&input.path, &source, colorize, &err),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&program) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: failed to encode IR: {err}");
            std::process::exit(1);
        }
    }
}
