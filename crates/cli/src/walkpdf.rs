//! walkpdf - report PDF structure and execute page content streams.
//!
//! Parses the document's xref data, prints the catalog/info object
//! numbers and object count, then walks the page tree and runs each
//! page's content streams through the PostScript interpreter.

use bytes::Bytes;
use clap::Parser;
use goya_core::{execute_content, ConsoleDevice, PdfDocument, PdfPage, PsInterpreter, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "walkpdf",
    version,
    about = "Report PDF structure and execute page content streams"
)]
struct Args {
    /// PDF file to process.
    file: PathBuf,

    /// Report the document structure only; skip content execution.
    #[arg(long)]
    structure_only: bool,
}

fn run(args: &Args) -> Result<()> {
    let file = File::open(&args.file)?;
    let mmap = unsafe { Mmap::map(&file)? };
    let doc = PdfDocument::new(Bytes::from_owner(mmap))?;

    println!("root object: {}", doc.root_objid());
    println!("info object: {}", doc.info_objid());
    println!("catalog object: {}", doc.catalog_objid());
    println!("total objects: {}", doc.object_count());

    let pages = PdfPage::create_pages(&doc)?;
    println!("pages: {}", pages.len());

    if args.structure_only {
        return Ok(());
    }

    for (index, page) in pages.iter().enumerate() {
        println!("--- page {} (object {}) ---", index + 1, page.objid);
        let stdout = io::stdout();
        let mut device = ConsoleDevice::new(stdout.lock());
        let mut interp = PsInterpreter::new(&mut device);
        for stream in &page.contents {
            execute_content(&mut interp, stream)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("walkpdf: {err}");
            ExitCode::FAILURE
        }
    }
}
