//! `gemc check` - run the analyser and node-expansion passes and report
//! diagnostics without running the memory manager or a backend. Silent on
//! success.

use std::rc::Rc;

use gemc_compiler::{Analyser, ModuleLoader, NodeExpansion};
use gemc_ir::{IrFile, Pass};

use crate::cli::{InputArgs, OptionsArgs};
use crate::util::{load_program, report_and_exit};

pub fn run(input: InputArgs, options: OptionsArgs) {
    let (program, source) = load_program(&input.path).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let colorize = input.color.should_colorize();
    let source_for_errors = source.clone();
    let file = IrFile::new(&input.path, source, gemc_compiler::intrinsics::root_scope(), options.into_compile_options());
    let loader = Rc::new(ModuleLoader::minimal());

    let (file, result) = match Analyser::new(file, loader).analyse(program) {
        Ok((program, file)) => (file, NodeExpansion::new().run_on(program).map(|_| ())),
        Err(err) => report_and_exit(&input.path, &source_for_errors, colorize, &err),
    };

    if let Err(err) = result {
        eprint!("{}", file.render_error_colored(&err, colorize));
        std::process::exit(1);
    }
}
