//! runps - execute a PostScript program.
//!
//! With a file argument the program is read and executed; without one
//! a built-in sample runs instead. Draw events print to stdout.

use clap::Parser;
use goya_core::{ConsoleDevice, PsInterpreter};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sample program run when no file is given: text output, arithmetic,
/// a defined procedure, and a stroked box.
const SAMPLE_PROGRAM: &[u8] = br#"%!PS
(Hello, PostScript!) show
5 3 add show

/square { dup mul } def

newpath
100 100 moveto
200 100 lineto
200 200 lineto
100 200 lineto
closepath
0 0 1 setrgbcolor
4 square setlinewidth
stroke
showpage
"#;

#[derive(Parser)]
#[command(name = "runps", version, about = "Execute a PostScript program")]
struct Args {
    /// PostScript file to execute; the built-in sample runs when omitted.
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match &args.file {
        Some(path) => match fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("runps: cannot read {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SAMPLE_PROGRAM.to_vec(),
    };

    let stdout = io::stdout();
    let mut device = ConsoleDevice::new(stdout.lock());
    let mut interp = PsInterpreter::new(&mut device);

    if let Err(err) = interp.execute(&source) {
        eprintln!("runps: {err}");
        return ExitCode::FAILURE;
    }

    // Shown text does not end its own line.
    let mut out = device.into_inner();
    let _ = out.write_all(b"\n");
    ExitCode::SUCCESS
}
