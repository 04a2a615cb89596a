//! PDF content-stream execution.
//!
//! Content streams are written in a PDF-flavored dialect of
//! PostScript: operands first, then a short operator. Execution
//! rewrites each operator token to the PostScript name the
//! interpreter knows and feeds everything else through unchanged.

use crate::error::Result;
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::parser::lexer;

/// Maps a short PDF content-stream operator to the corresponding
/// PostScript operator name. Tokens not in the table (numbers,
/// strings, unhandled operators) pass through unchanged.
pub fn map_pdf_operator(token: &str) -> Option<&'static str> {
    Some(match token {
        "m" => "moveto",
        "l" => "lineto",
        "c" => "curveto",
        "h" => "closepath",
        "S" => "stroke",
        "f" | "F" => "fill",
        "n" => "newpath",
        "q" => "gsave",
        "Q" => "grestore",
        "w" => "setlinewidth",
        "rg" | "RG" => "setrgbcolor",
        "g" | "G" => "setgray",
        "Tj" => "show",
        _ => return None,
    })
}

/// Executes content-stream bytes through a PostScript interpreter.
///
/// Two operators have no one-token PostScript spelling and are
/// expanded structurally: `re` (rectangle subpath) and `cm` (matrix
/// concatenation from six loose operands).
pub fn execute_content<D: Device>(interp: &mut PsInterpreter<'_, D>, data: &[u8]) -> Result<()> {
    for token in lexer::tokenize(data)? {
        match token.as_str() {
            "re" => interp.rect_path()?,
            "cm" => interp.concat_from_operands()?,
            tok => match map_pdf_operator(tok) {
                Some(ps_name) => interp.execute_token(ps_name)?,
                None => interp.execute_token(tok)?,
            },
        }
    }
    Ok(())
}
