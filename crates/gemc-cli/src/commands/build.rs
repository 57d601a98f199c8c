//! `gemc build` - run the full pipeline and hand the result to a backend.
//! The backend is pinned out of this workspace, so this command
//! drives `NullBackend`; a real distribution would link this command
//! against a crate implementing `gemc_compiler::backend::Backend`.

use std::rc::Rc;

use gemc_compiler::ModuleLoader;
use gemc_compiler::backend::Backend;
use gemc_ir::Node;

use super::null_backend::NullBackend;
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

    let (program, file) = match result {
        Ok(output) => output,
        Err(gemc_compiler::Error::Comptime(err)) => report_and_exit(&input.path, &source, colorize, &err),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let Node::Program(program) = program else {
        eprintln!("error: pipeline did not return a Program node");
        std::process::exit(1);
    };

    match NullBackend.emit(&file, &program) {
        Ok(artefact) => println!("compiled {} function(s)", artefact.function_count),
        Err(err) => {
            eprint!("{}", file.render_error_colored(&err, colorize));
            std::process::exit(1);
        }
    }
}
