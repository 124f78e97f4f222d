//! C0 MIPS Compiler Driver
//!
//! Reads a validated program as JSON, generates quadruples, lowers them to
//! MIPS32 assembly and either writes the result or runs it in the bundled
//! simulator.

use c0c_ast::Program;
use c0c_backend::{lower_module, BackendOptions, CodegenError};
use c0c_codegen::{emit_program, AsmProgram};
use c0c_common::CompilerError;
use c0c_ir::{generate_program, GeneratorOptions, IrModule};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "c0c")]
#[command(about = "C0 to MIPS32 Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log every phase at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON program to MIPS assembly
    Compile {
        /// Input program (JSON typed syntax tree)
        input: PathBuf,

        /// Output assembly file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the quadruple listing to stdout
        #[arg(long)]
        print_ir: bool,

        /// Save the quadruple listing to a file with .ir extension
        #[arg(long)]
        save_ir: bool,

        /// Specify output path for IR file (used with --save-ir)
        #[arg(long)]
        ir_output: Option<PathBuf>,

        /// Dump the generated module as JSON
        #[arg(long)]
        emit_ir_json: Option<PathBuf>,

        #[command(flatten)]
        flags: CodegenFlags,
    },

    /// Compile a JSON program and execute it in the simulator
    Run {
        /// Input program (JSON typed syntax tree)
        program: PathBuf,

        /// Text served to the program's read syscalls
        #[arg(long, default_value = "")]
        input: String,

        #[command(flatten)]
        flags: CodegenFlags,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
struct CodegenFlags {
    /// Keep arithmetic on literals as quadruples
    #[arg(long)]
    no_fold: bool,

    /// Keep every local in the stack frame, even in leaf functions
    #[arg(long)]
    no_leaf_registers: bool,

    /// Emit the epilogue at every return instead of jumping to the exit label
    #[arg(long)]
    inline_epilogue: bool,

    /// Do not annotate the assembly with the quadruple listing
    #[arg(long)]
    no_comments: bool,

    /// Pass the first four arguments in $a0-$a3
    #[arg(long)]
    reg_args: bool,
}

impl CodegenFlags {
    fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            fold_constants: !self.no_fold,
            leaf_registers: !self.no_leaf_registers,
        }
    }

    fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            inline_epilogue: self.inline_epilogue,
            annotate: !self.no_comments,
            reg_args: self.reg_args,
        }
    }
}

/// Result of running the whole pipeline on one program
struct Compilation {
    module: IrModule,
    program: AsmProgram,
    assembly: String,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Compile {
            input,
            output,
            print_ir,
            save_ir,
            ir_output,
            emit_ir_json,
            flags,
        } => {
            let outputs = OutputPaths {
                assembly: output,
                save_ir,
                ir: ir_output,
                ir_json: emit_ir_json,
            };
            if let Err(e) = compile_file(&input, &outputs, print_ir, flags) {
                eprintln!("Error compiling {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::Run { program, input, flags } => match run_file(&program, &input, flags) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                eprintln!("Error running {}: {}", program.display(), e);
                std::process::exit(1);
            }
        },
    }
}

struct OutputPaths {
    assembly: Option<PathBuf>,
    save_ir: bool,
    ir: Option<PathBuf>,
    ir_json: Option<PathBuf>,
}

fn parse_program(source: &str) -> Result<Program, CompilerError> {
    serde_json::from_str(source).map_err(|e| CompilerError::Input {
        message: e.to_string(),
    })
}

fn load_program(path: &Path) -> Result<Program, CompilerError> {
    let source = fs::read_to_string(path)?;
    parse_program(&source)
}

fn compile(program: &Program, flags: CodegenFlags) -> Result<Compilation, CompilerError> {
    let module = generate_program(program, &flags.generator_options())?;
    info!(
        "generated {} functions, {} data entries",
        module.functions.len(),
        module.data.len()
    );

    let asm = lower_module(&module, &flags.backend_options())?;
    let assembly = emit_program(&asm).map_err(CodegenError::from)?;

    Ok(Compilation {
        module,
        program: asm,
        assembly,
    })
}

fn compile_file(
    input_path: &Path,
    outputs: &OutputPaths,
    print_ir: bool,
    flags: CodegenFlags,
) -> Result<(), CompilerError> {
    let program = load_program(input_path)?;
    let compilation = compile(&program, flags)?;
    let listing = compilation.module.listing();

    if print_ir {
        println!("=== IR Output ===");
        print!("{}", listing);
        println!("=== End IR ===");
    }

    if outputs.save_ir {
        let ir_path = outputs
            .ir
            .clone()
            .unwrap_or_else(|| input_path.with_extension("ir"));
        fs::write(&ir_path, &listing)?;
        println!("IR saved to: {}", ir_path.display());
    }

    if let Some(path) = &outputs.ir_json {
        let json = serde_json::to_string_pretty(&compilation.module).map_err(CompilerError::internal)?;
        fs::write(path, json)?;
        println!("IR JSON saved to: {}", path.display());
    }

    let asm_path = outputs
        .assembly
        .clone()
        .unwrap_or_else(|| input_path.with_extension("s"));
    fs::write(&asm_path, &compilation.assembly)?;
    println!("Assembly written to: {}", asm_path.display());
    Ok(())
}

fn run_file(path: &Path, input: &str, flags: CodegenFlags) -> Result<String, CompilerError> {
    let program = load_program(path)?;
    let compilation = compile(&program, flags)?;
    let outcome = c0c_sim::run_program(&compilation.program, input)?;
    info!("program stopped after {} steps ({:?})", outcome.steps, outcome.stop);
    Ok(outcome.output)
}
