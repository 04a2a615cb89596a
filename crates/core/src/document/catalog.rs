//! PDF document - xref parsing and object resolution.
//!
//! Entry point for reading a PDF: locate the final `startxref`
//! marker, load the cross-reference information found at that offset
//! (either a classical table or a compressed xref stream), read the
//! trailer, and resolve the catalog. Objects are parsed on demand
//! from their recorded file offsets.

use crate::error::{GoyaError, Result};
use crate::model::objects::{PdfObject, PdfStream};
use crate::parser::pdf_parser::PdfParser;
use bytes::Bytes;
use std::collections::HashMap;

/// Upper bound on reference chains during resolution; the object
/// graph is expected to be a DAG, but a malformed file could tie a
/// reference loop.
const MAX_RESOLVE_DEPTH: usize = 32;

/// PDF document - provides access to PDF objects and metadata.
pub struct PdfDocument {
    data: Bytes,
    /// Map from object ID to byte offset of its indirect object.
    offsets: HashMap<u32, usize>,
    /// Trailer dictionary (or the xref stream's dictionary).
    trailer: HashMap<String, PdfObject>,
    /// Resolved catalog dictionary.
    catalog: HashMap<String, PdfObject>,
    /// Object number of the catalog reference in the trailer (0 if absent).
    root_objid: u32,
    /// Object number of the document info reference (0 if absent).
    info_objid: u32,
    /// Object number of a `/Type /Catalog` object (0 if absent).
    catalog_objid: u32,
}

impl PdfDocument {
    /// Parse a PDF document from raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        let mut doc = Self {
            data: data.into(),
            offsets: HashMap::new(),
            trailer: HashMap::new(),
            catalog: HashMap::new(),
            root_objid: 0,
            info_objid: 0,
            catalog_objid: 0,
        };
        doc.parse()?;
        Ok(doc)
    }

    /// The raw PDF bytes.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Parse the document structure.
    fn parse(&mut self) -> Result<()> {
        if !self.data.starts_with(b"%PDF") {
            return Err(GoyaError::Syntax("missing %PDF header".into()));
        }

        let startxref = self.find_startxref()?;
        self.load_xref_at(startxref)?;

        if let Some(PdfObject::Ref(root)) = self.trailer.get("Root") {
            self.root_objid = root.objid;
        }
        if let Some(PdfObject::Ref(info)) = self.trailer.get("Info") {
            self.info_objid = info.objid;
        }

        if self.root_objid != 0 {
            let root = self.getobj(self.root_objid)?;
            self.catalog = root.as_dict()?.clone();
        }

        Ok(())
    }

    /// Locate the last `startxref` marker and parse the offset that
    /// follows it.
    fn find_startxref(&self) -> Result<usize> {
        let needle = b"startxref";
        let data = self.data.as_ref();
        if data.len() < needle.len() {
            return Err(GoyaError::Syntax("PDF too small".into()));
        }

        let start = (0..=data.len() - needle.len())
            .rev()
            .find(|&i| &data[i..i + needle.len()] == needle)
            .ok_or(GoyaError::NoValidXRef)?;

        let rest = &data[start + needle.len()..];
        let mut pos = 0;
        while pos < rest.len() && rest[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut end = pos;
        while end < rest.len() && rest[end].is_ascii_digit() {
            end += 1;
        }
        if end == pos {
            return Err(GoyaError::NoValidXRef);
        }
        std::str::from_utf8(&rest[pos..end])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(GoyaError::NoValidXRef)
    }

    /// Load the cross-reference data found at the given offset: a
    /// classical table when it opens with the `xref` keyword, an xref
    /// stream object otherwise.
    fn load_xref_at(&mut self, pos: usize) -> Result<()> {
        if pos >= self.data.len() {
            return Err(GoyaError::NoValidXRef);
        }
        if self.data[pos..].starts_with(b"xref") {
            self.load_traditional_xref(pos)
        } else {
            self.load_xref_stream(pos)
        }
    }

    /// Reads an unsigned decimal, returning the value and the bytes
    /// consumed.
    fn read_number(data: &[u8]) -> Result<(u64, usize)> {
        let mut end = 0;
        while end < data.len() && data[end].is_ascii_digit() {
            end += 1;
        }
        if end == 0 {
            return Err(GoyaError::Syntax("expected number".into()));
        }
        let value = std::str::from_utf8(&data[..end])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| GoyaError::Syntax("invalid number".into()))?;
        Ok((value, end))
    }

    fn skip_whitespace(data: &[u8], mut cursor: usize) -> usize {
        while cursor < data.len() && data[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        cursor
    }

    /// Load a classical xref table: subsections of `first count`
    /// headers followed by 20-byte entries, terminated by `trailer`
    /// and its dictionary.
    fn load_traditional_xref(&mut self, pos: usize) -> Result<()> {
        let data = &self.data.as_ref()[pos..];
        let mut cursor = 4; // past "xref"

        loop {
            cursor = Self::skip_whitespace(data, cursor);
            if cursor >= data.len() {
                break;
            }
            if data[cursor..].starts_with(b"trailer") {
                cursor += 7;
                break;
            }

            // Subsection header: first count
            let (first, consumed) = Self::read_number(&data[cursor..])?;
            cursor += consumed;
            cursor = Self::skip_whitespace(data, cursor);
            let (count, consumed) = Self::read_number(&data[cursor..])?;
            cursor += consumed;

            for i in 0..count {
                cursor = Self::skip_whitespace(data, cursor);
                let (offset, consumed) = Self::read_number(&data[cursor..])?;
                cursor += consumed;
                cursor = Self::skip_whitespace(data, cursor);
                let (_genno, consumed) = Self::read_number(&data[cursor..])?;
                cursor += consumed;
                cursor = Self::skip_whitespace(data, cursor);

                let marker = match data.get(cursor) {
                    Some(&m @ (b'n' | b'f')) => {
                        cursor += 1;
                        m
                    }
                    _ => {
                        return Err(GoyaError::Syntax(format!(
                            "bad xref entry for object {}",
                            first + i
                        )));
                    }
                };

                if marker == b'n' {
                    self.offsets.insert((first + i) as u32, offset as usize);
                }
            }
        }

        // Trailer dictionary follows the `trailer` keyword.
        let cursor = Self::skip_whitespace(data, cursor);
        if !data[cursor..].starts_with(b"<<") {
            return Err(GoyaError::Syntax("missing trailer dictionary".into()));
        }
        let mut parser = PdfParser::new(&data[cursor..]);
        let trailer = parser.parse_object()?;
        self.trailer = trailer.as_dict()?.clone();

        Ok(())
    }

    /// Load a compressed xref stream (PDF 1.5+): a `/Type /XRef`
    /// stream object whose inflated payload is a table of fixed-width
    /// big-endian records. Its dictionary doubles as the trailer.
    fn load_xref_stream(&mut self, pos: usize) -> Result<()> {
        let obj = self.parse_object_at(pos)?;
        let stream = obj.as_stream()?;

        match stream.get("Type") {
            Some(PdfObject::Name(name)) if name == "XRef" => {}
            _ => {
                return Err(GoyaError::Syntax(
                    "object at startxref offset is not an xref stream".into(),
                ));
            }
        }

        let w = stream
            .get("W")
            .ok_or_else(|| GoyaError::Syntax("missing W in xref stream".into()))?
            .as_array()?;
        if w.len() != 3 {
            return Err(GoyaError::Syntax("W must have 3 elements".into()));
        }
        let w0 = w[0].as_int()? as usize;
        let w1 = w[1].as_int()? as usize;
        let w2 = w[2].as_int()? as usize;
        let entry_size = w0 + w1 + w2;
        if entry_size == 0 {
            return Err(GoyaError::Syntax("empty xref stream entries".into()));
        }

        let size = stream
            .get("Size")
            .ok_or_else(|| GoyaError::Syntax("missing Size in xref stream".into()))?
            .as_int()? as usize;

        // Index defaults to [0 Size]
        let index: Vec<(u32, usize)> = match stream.get("Index") {
            Some(idx) => {
                let arr = idx.as_array()?;
                let mut pairs = Vec::new();
                let mut i = 0;
                while i + 1 < arr.len() {
                    pairs.push((arr[i].as_int()? as u32, arr[i + 1].as_int()? as usize));
                    i += 2;
                }
                pairs
            }
            None => vec![(0, size)],
        };

        let data = match self.decode_stream(stream) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("warning: abandoning xref stream: {err}");
                return Err(err);
            }
        };

        let mut data_pos = 0;
        for (first, count) in index {
            for i in 0..count {
                if data_pos + entry_size > data.len() {
                    break;
                }
                let objid = first + i as u32;

                // A zero-width type field defaults to type 1.
                let entry_type = if w0 > 0 {
                    crate::utils::nunpack(&data[data_pos..data_pos + w0], 1)
                } else {
                    1
                };
                let field1 = crate::utils::nunpack(&data[data_pos + w0..data_pos + w0 + w1], 0);
                let _field2 =
                    crate::utils::nunpack(&data[data_pos + w0 + w1..data_pos + entry_size], 0);
                data_pos += entry_size;

                match entry_type {
                    0 => {} // free
                    1 => {
                        self.offsets.insert(objid, field1 as usize);
                    }
                    2 => {
                        eprintln!(
                            "warning: object {objid} lives in object stream {field1}, not supported"
                        );
                    }
                    _ => {}
                }
            }
        }

        // The stream dictionary serves as the trailer.
        for (key, value) in &stream.attrs {
            if !matches!(key.as_str(), "Length" | "Filter" | "DecodeParms" | "W" | "Index") {
                self.trailer.insert(key.clone(), value.clone());
            }
        }

        Ok(())
    }

    /// Parse the indirect object (`N G obj ... endobj`) at a byte
    /// offset, attaching stream payload bytes when a dictionary is
    /// followed by the `stream` keyword.
    fn parse_object_at(&self, offset: usize) -> Result<PdfObject> {
        let file = self.data.as_ref();
        if offset >= file.len() {
            return Err(GoyaError::Syntax(format!(
                "object offset {} exceeds file size {}",
                offset,
                file.len()
            )));
        }
        let data = &file[offset..];
        let mut cursor = 0;

        // "objid genno obj"
        let (_objid, consumed) = Self::read_number(&data[cursor..])?;
        cursor += consumed;
        cursor = Self::skip_whitespace(data, cursor);
        let (_genno, consumed) = Self::read_number(&data[cursor..])?;
        cursor += consumed;
        cursor = Self::skip_whitespace(data, cursor);

        if !data[cursor..].starts_with(b"obj") {
            return Err(GoyaError::Syntax(format!(
                "expected 'obj' at offset {offset}"
            )));
        }
        cursor += 3;
        cursor = Self::skip_whitespace(data, cursor);

        let mut parser = PdfParser::new(&data[cursor..]);
        let obj = parser.parse_object()?;
        let after_obj = cursor + parser.tell();

        // Dictionary followed by `stream` means a stream object.
        if let PdfObject::Dict(dict) = &obj {
            let mut pos = Self::skip_whitespace(data, after_obj);
            if data[pos..].starts_with(b"stream") {
                pos += 6;
                // Payload starts after the end-of-line marker.
                if data.get(pos) == Some(&b'\r') {
                    pos += 1;
                }
                if data.get(pos) == Some(&b'\n') {
                    pos += 1;
                }

                let declared = self.stream_length(dict);
                let payload = match declared {
                    Some(length) if pos + length <= data.len() => {
                        self.data.slice(offset + pos..offset + pos + length)
                    }
                    _ => {
                        let end = Self::find_endstream(&data[pos..]).ok_or_else(|| {
                            GoyaError::Syntax("stream without endstream".into())
                        })?;
                        self.data.slice(offset + pos..offset + pos + end)
                    }
                };

                return Ok(PdfObject::Stream(Box::new(PdfStream::new(
                    dict.clone(),
                    payload,
                ))));
            }
        }

        Ok(obj)
    }

    /// Declared stream length, following one indirect reference if
    /// needed. None means the length is unusable and the payload must
    /// be found by scanning for `endstream`.
    fn stream_length(&self, dict: &HashMap<String, PdfObject>) -> Option<usize> {
        match dict.get("Length") {
            Some(PdfObject::Int(n)) if *n >= 0 => Some(*n as usize),
            Some(PdfObject::Ref(r)) => {
                let resolved = self.getobj(r.objid).ok()?;
                let n = resolved.as_int().ok()?;
                (n >= 0).then_some(n as usize)
            }
            _ => None,
        }
    }

    /// Position of the `endstream` marker, with trailing end-of-line
    /// bytes before it excluded from the payload.
    fn find_endstream(data: &[u8]) -> Option<usize> {
        let needle = b"endstream";
        if data.len() < needle.len() {
            return None;
        }
        for pos in 0..=data.len() - needle.len() {
            if &data[pos..pos + needle.len()] == needle {
                let mut end = pos;
                while end > 0 && matches!(data[end - 1], b' ' | b'\r' | b'\n') {
                    end -= 1;
                }
                return Some(end);
            }
        }
        None
    }

    /// Fetch an object by object number.
    pub fn getobj(&self, objid: u32) -> Result<PdfObject> {
        let offset = self
            .offsets
            .get(&objid)
            .copied()
            .ok_or(GoyaError::ObjectNotFound(objid))?;
        self.parse_object_at(offset)
    }

    /// Resolve indirect references until a direct object is reached.
    pub fn resolve(&self, obj: &PdfObject) -> Result<PdfObject> {
        let mut current = obj.clone();
        for _ in 0..MAX_RESOLVE_DEPTH {
            match current {
                PdfObject::Ref(r) => current = self.getobj(r.objid)?,
                other => return Ok(other),
            }
        }
        Err(GoyaError::Syntax("reference chain too deep".into()))
    }

    /// Decode a stream's payload. FlateDecode is the supported
    /// filter; an unfiltered stream passes through unchanged.
    pub fn decode_stream(&self, stream: &PdfStream) -> Result<Vec<u8>> {
        let filter = match stream.get("Filter") {
            Some(filter) => self.resolve(filter)?,
            None => return Ok(stream.rawdata().to_vec()),
        };

        let filter_name = match &filter {
            PdfObject::Name(name) => name.clone(),
            PdfObject::Array(arr) if arr.len() == 1 => {
                self.resolve(&arr[0])?.as_name()?.to_string()
            }
            _ => {
                return Err(GoyaError::Decode("unsupported filter chain".into()));
            }
        };

        if filter_name != "FlateDecode" {
            return Err(GoyaError::Decode(format!(
                "unsupported filter: {filter_name}"
            )));
        }

        inflate(stream.rawdata())
    }

    /// Document trailer dictionary.
    pub const fn trailer(&self) -> &HashMap<String, PdfObject> {
        &self.trailer
    }

    /// Resolved document catalog.
    pub const fn catalog(&self) -> &HashMap<String, PdfObject> {
        &self.catalog
    }

    /// Object number the trailer's Root entry points at (0 if absent).
    pub const fn root_objid(&self) -> u32 {
        self.root_objid
    }

    /// Object number of the document info dictionary (0 if absent).
    pub const fn info_objid(&self) -> u32 {
        self.info_objid
    }

    /// Object number of a `/Type /Catalog` object (0 if absent).
    pub const fn catalog_objid(&self) -> u32 {
        self.catalog_objid
    }

    /// Number of objects the xref made reachable.
    pub fn object_count(&self) -> usize {
        self.offsets.len()
    }

    /// All reachable object numbers, sorted.
    pub fn objids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.offsets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// ZLIB-format inflate over an in-memory byte slice.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read;
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(_) => {
            // Lenient fallback: keep whatever decompressed before the
            // error (commonly a bad checksum at the very end).
            let out = inflate_corrupted(data);
            if out.is_empty() {
                Err(GoyaError::Decode("flate decompression failed".into()))
            } else {
                Ok(out)
            }
        }
    }
}

/// Best-effort zlib decompression for corrupted streams: feed the
/// decoder byte by byte and return the output accumulated up to the
/// point of failure.
fn inflate_corrupted(data: &[u8]) -> Vec<u8> {
    use flate2::{Decompress, FlushDecompress, Status};
    let mut decoder = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut buf = [0u8; 4096];
    let mut i = 0usize;
    while i < data.len() {
        let before_out = decoder.total_out();
        let before_in = decoder.total_in();
        let res = decoder.decompress(&data[i..i + 1], &mut buf, FlushDecompress::None);
        let produced = (decoder.total_out() - before_out) as usize;
        if produced > 0 {
            out.extend_from_slice(&buf[..produced]);
        }
        let consumed = (decoder.total_in() - before_in) as usize;
        i += consumed.max(1);
        match res {
            Ok(Status::StreamEnd) | Err(_) => break,
            Ok(_) => {}
        }
    }
    out
}
