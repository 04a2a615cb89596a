//! Tests for the PostScript executor and operator library.
//!
//! A recording device captures shown text and draw events so the
//! end-to-end scenarios can assert on emitted output as well as on
//! operand-stack state.

use goya_core::{Device, GoyaError, GraphicsState, PathSegment, PsInterpreter, Value};

/// One captured paint event with its state snapshot.
#[derive(Debug, Clone)]
enum Event {
    Stroke {
        path: Vec<PathSegment>,
        rgb: (f64, f64, f64),
        line_width: f64,
    },
    Fill {
        path: Vec<PathSegment>,
    },
    ShowPage,
}

#[derive(Default)]
struct RecordingDevice {
    text: Vec<u8>,
    events: Vec<Event>,
}

impl Device for RecordingDevice {
    fn show_text(&mut self, text: &[u8]) {
        self.text.extend_from_slice(text);
    }

    fn stroke_path(&mut self, path: &[PathSegment], state: &GraphicsState) {
        self.events.push(Event::Stroke {
            path: path.to_vec(),
            rgb: state.rgb,
            line_width: state.line_width,
        });
    }

    fn fill_path(&mut self, path: &[PathSegment], _state: &GraphicsState) {
        self.events.push(Event::Fill {
            path: path.to_vec(),
        });
    }

    fn show_page(&mut self) {
        self.events.push(Event::ShowPage);
    }
}

/// Run a program and return the device alongside the interpreter's
/// final operand stack (top last).
fn run(source: &[u8]) -> (RecordingDevice, Vec<Value>) {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(source).expect("program should execute");
    let stack: Vec<Value> = interp.stack().iter().cloned().collect();
    (device, stack)
}

fn run_err(source: &[u8]) -> GoyaError {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(source)
        .expect_err("program should fail")
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

/// E1: show emits string contents and printable forms.
#[test]
fn test_show_text_and_number() {
    let (device, stack) = run(b"(Hello) show 5 3 add show");
    assert_eq!(device.text, b"Hello8");
    assert!(stack.is_empty());
}

/// E2: procedure definition and invocation.
#[test]
fn test_square_procedure() {
    let (_, stack) = run(b"/square { dup mul } def\n4 square");
    assert_eq!(stack.len(), 1);
    assert!(matches!(stack[0], Value::Integer(16)));
}

/// E3: array creation, shared mutation through put, length.
#[test]
fn test_array_put_and_length() {
    let (_, stack) = run(b"5 array dup 0 (Hello) put 1 42 put\nlength");
    assert_eq!(stack.len(), 2);
    assert!(matches!(stack[1], Value::Integer(5)));
    // The array below the count observed both writes.
    assert_eq!(stack[0].to_string(), "[(Hello) 42 null null null]");
}

/// E4: conditionals.
#[test]
fn test_if_and_ifelse() {
    let (device, stack) = run(
        b"true  { (A) show } if
false { (B) show } if
5 3 gt { (GT) show } { (LE) show } ifelse",
    );
    assert_eq!(device.text, b"AGT");
    assert!(stack.is_empty());
}

/// E5: a stroked box carries the path and state snapshot; the path is
/// cleared afterwards.
#[test]
fn test_stroke_event() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(
            b"newpath 100 100 moveto 200 100 lineto 200 200 lineto 100 200 lineto closepath \
              0 0 1 setrgbcolor 2 setlinewidth stroke",
        )
        .unwrap();
    assert!(interp.gstate().path.is_empty(), "stroke must clear the path");

    assert_eq!(device.events.len(), 1);
    match &device.events[0] {
        Event::Stroke {
            path,
            rgb,
            line_width,
        } => {
            assert_eq!(
                path,
                &vec![
                    PathSegment::MoveTo((100.0, 100.0)),
                    PathSegment::LineTo((200.0, 100.0)),
                    PathSegment::LineTo((200.0, 200.0)),
                    PathSegment::LineTo((100.0, 200.0)),
                    PathSegment::Close,
                ]
            );
            assert_eq!(*rgb, (0.0, 0.0, 1.0));
            assert_eq!(*line_width, 2.0);
        }
        other => panic!("expected stroke event, got {other:?}"),
    }
}

// ============================================================================
// Invariants
// ============================================================================

/// Matched gsave/grestore pairs leave the graphics stack at depth 1.
#[test]
fn test_gsave_grestore_depth() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(b"gsave gsave 1 0 0 setrgbcolor grestore grestore gsave grestore")
        .unwrap();
    assert_eq!(interp.graphics_depth(), 1);
}

/// gsave/grestore round-trips the state bit-identically.
#[test]
fn test_gsave_grestore_restores_state() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(b"10 10 moveto 3 setlinewidth 0.5 0.25 1 setrgbcolor 30 rotate")
        .unwrap();
    let before = interp.gstate().clone();
    interp
        .execute(b"gsave 99 99 lineto 7 setlinewidth 1 1 0 setrgbcolor 2 2 scale grestore")
        .unwrap();
    assert_eq!(*interp.gstate(), before);
}

/// put followed by get reads the stored value.
#[test]
fn test_put_then_get() {
    let (_, stack) = run(b"3 array dup 1 (x) put pop dup 1 get");
    assert_eq!(stack.len(), 2);
    assert!(matches!(&stack[1], Value::String(s) if s == "(x)"));
}

/// dup duplicates identity, not contents.
#[test]
fn test_dup_exch_identity() {
    let (_, stack) = run(b"2 array dup exch");
    assert_eq!(stack.len(), 2);
    assert!(stack[0].is_same_object(&stack[1]));
}

/// Mutation through one handle is observable through the other.
#[test]
fn test_array_aliasing() {
    let (_, stack) = run(b"/a 2 array def a 0 7 put pop a 0 get");
    assert!(matches!(stack.last().unwrap(), Value::Integer(7)));
}

/// Arithmetic promotion across all four operators.
#[test]
fn test_arithmetic_promotion() {
    let (_, stack) = run(b"1 2 add 1.5 2 add 2 3 mul 0.5 4 mul 7 2 sub 7 0.5 sub 7 2 div 7 2.0 div");
    let expect: &[Value] = &[
        Value::Integer(3),
        Value::Real(3.5),
        Value::Integer(6),
        Value::Real(2.0),
        Value::Integer(5),
        Value::Real(6.5),
        Value::Integer(3), // truncating integer division
        Value::Real(3.5),
    ];
    assert_eq!(stack.len(), expect.len());
    for (got, want) in stack.iter().zip(expect) {
        assert!(
            got.eq_value(want),
            "expected {want:?}, got {got:?}"
        );
    }
}

/// forall pushes elements in order through an identity procedure.
#[test]
fn test_forall_identity() {
    let (_, stack) = run(b"3 array dup 0 10 put dup 1 20 put dup 2 30 put {} forall");
    // The two puts re-push the array; the trailing stack is the three
    // elements in order.
    let n = stack.len();
    assert!(matches!(stack[n - 3], Value::Integer(10)));
    assert!(matches!(stack[n - 2], Value::Integer(20)));
    assert!(matches!(stack[n - 1], Value::Integer(30)));
}

/// Name lookup is insertion sensitive: later def wins.
#[test]
fn test_redefinition() {
    let (_, stack) = run(b"/k 1 def k /k 2 def k");
    assert!(matches!(stack[0], Value::Integer(1)));
    assert!(matches!(stack[1], Value::Integer(2)));
}

/// Procedures resolve names when run, not when defined.
#[test]
fn test_dynamic_scope() {
    let (_, stack) = run(b"/p { k } def /k 1 def p /k 2 def p");
    assert!(matches!(stack[0], Value::Integer(1)));
    assert!(matches!(stack[1], Value::Integer(2)));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_newpath_is_idempotent() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"1 2 moveto newpath newpath").unwrap();
    assert!(interp.gstate().path.is_empty());
}

/// aload then astore leaves only the array.
#[test]
fn test_aload_astore_round_trip() {
    let (_, stack) = run(b"3 array dup 0 1 put dup 1 2 put dup 2 3 put aload astore");
    // Two puts each re-push the array; aload/astore consume their
    // pushes and leave the array on top.
    assert!(matches!(stack.last().unwrap(), Value::Array(_)));
    assert_eq!(stack.last().unwrap().to_string(), "[1 2 3]");
}

#[test]
fn test_astore_stores_in_stack_order() {
    let (_, stack) = run(b"10 20 30 3 array astore");
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].to_string(), "[10 20 30]");
}

// ============================================================================
// Boundary behaviors
// ============================================================================

#[test]
fn test_zero_length_array() {
    let (_, stack) = run(b"0 array length");
    assert!(matches!(stack[0], Value::Integer(0)));
}

#[test]
fn test_negative_array_size_fails() {
    assert!(matches!(run_err(b"-1 array"), GoyaError::Range(_)));
}

#[test]
fn test_for_with_zero_step_fails() {
    assert!(matches!(run_err(b"1 10 0 {} for"), GoyaError::Range(_)));
}

#[test]
fn test_grestore_on_last_state_fails() {
    assert!(matches!(
        run_err(b"grestore"),
        GoyaError::StackUnderflow("graphics state stack")
    ));
}

#[test]
fn test_div_by_zero_fails() {
    assert!(matches!(run_err(b"1 0 div"), GoyaError::DivisionByZero));
    assert!(matches!(run_err(b"1.0 0.0 div"), GoyaError::DivisionByZero));
}

#[test]
fn test_operand_underflow_fails() {
    assert!(matches!(
        run_err(b"1 add"),
        GoyaError::StackUnderflow("operand stack")
    ));
}

#[test]
fn test_moveto_on_string_fails() {
    assert!(matches!(
        run_err(b"(a) (b) moveto"),
        GoyaError::TypeError { .. }
    ));
}

#[test]
fn test_load_of_missing_name_fails() {
    assert!(matches!(run_err(b"/missing load"), GoyaError::Undefined(name) if name == "missing"));
}

#[test]
fn test_astore_requires_exact_arity() {
    assert!(matches!(
        run_err(b"1 2 3 array astore"),
        GoyaError::StackUnderflow("operand stack")
    ));
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_repeat() {
    let (device, _) = run(b"3 { (x) show } repeat");
    assert_eq!(device.text, b"xxx");
}

#[test]
fn test_for_ascending_and_descending() {
    let (_, stack) = run(b"1 4 1 { } for");
    let got: Vec<String> = stack.iter().map(|v| v.to_string()).collect();
    assert_eq!(got, vec!["1", "2", "3", "4"]);

    let (_, stack) = run(b"3 1 -1 { } for");
    let got: Vec<String> = stack.iter().map(|v| v.to_string()).collect();
    assert_eq!(got, vec!["3", "2", "1"]);
}

#[test]
fn test_for_accumulates() {
    let (_, stack) = run(b"0 1 10 2 { add } for");
    // 1 + 3 + 5 + 7 + 9
    assert!(matches!(stack[0], Value::Integer(25)));
}

#[test]
fn test_exec() {
    let (_, stack) = run(b"{ 2 3 mul } exec");
    assert!(matches!(stack[0], Value::Integer(6)));
}

#[test]
fn test_recursive_procedure() {
    // countdown: push n, n-1, ..., 1
    let (_, stack) = run(
        b"/countdown { dup 0 gt { dup 1 sub countdown } if } def 3 countdown",
    );
    let got: Vec<String> = stack.iter().map(|v| v.to_string()).collect();
    assert_eq!(got, vec!["3", "2", "1", "0"]);
}

#[test]
fn test_truthiness_of_numbers() {
    let (device, _) = run(b"1 { (a) show } if 0 { (b) show } if 0.0 { (c) show } if (s) { (d) show } if");
    assert_eq!(device.text, b"ad");
}

// ============================================================================
// Dictionaries
// ============================================================================

#[test]
fn test_dict_store_known_keys() {
    let (_, stack) = run(b"1 dict dup /k 5 store dup /k known exch /missing known");
    let n = stack.len();
    assert!(matches!(stack[n - 2], Value::Boolean(true)));
    assert!(matches!(stack[n - 1], Value::Boolean(false)));
}

#[test]
fn test_dict_keys_are_names() {
    let (_, stack) = run(b"1 dict dup /a 1 store keys length");
    assert!(matches!(stack.last().unwrap(), Value::Integer(1)));

    let (_, stack) = run(b"1 dict dup /a 1 store keys 0 get");
    assert!(matches!(stack.last().unwrap(), Value::Name(n) if n == "/a"));
}

#[test]
fn test_load_reads_current_dict() {
    let (_, stack) = run(b"/x 41 def /x load 1 add");
    assert!(matches!(stack.last().unwrap(), Value::Integer(42)));
}

#[test]
fn test_negative_dict_size_fails() {
    assert!(matches!(run_err(b"-2 dict"), GoyaError::Range(_)));
}

// ============================================================================
// Comparison semantics
// ============================================================================

#[test]
fn test_eq_is_tag_strict() {
    let (_, stack) = run(b"1 1.0 eq 1 1 eq (a) (a) eq (a) (b) ne");
    assert!(matches!(stack[0], Value::Boolean(false)));
    assert!(matches!(stack[1], Value::Boolean(true)));
    assert!(matches!(stack[2], Value::Boolean(true)));
    assert!(matches!(stack[3], Value::Boolean(true)));
}

#[test]
fn test_ordering_promotes() {
    let (_, stack) = run(b"1 2 lt 2.5 2 gt 2 2 le 3 2 ge");
    for value in &stack {
        assert!(matches!(value, Value::Boolean(true)));
    }
}

#[test]
fn test_ordering_on_strings_fails() {
    assert!(matches!(
        run_err(b"(a) (b) lt"),
        GoyaError::TypeError { .. }
    ));
}

// ============================================================================
// Composite literals
// ============================================================================

#[test]
fn test_array_literal() {
    let (_, stack) = run(b"[1 2.5 (s) /n true]");
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].to_string(), "[1 2.5 (s) /n true]");
}

#[test]
fn test_nested_array_literal() {
    let (_, stack) = run(b"[1 [2 3]] 1 get 0 get");
    assert!(matches!(stack.last().unwrap(), Value::Integer(2)));
}

#[test]
fn test_dict_literal() {
    let (_, stack) = run(b"<< /width 100 /name (box) >> dup /width known exch /name known");
    let n = stack.len();
    assert!(matches!(stack[n - 2], Value::Boolean(true)));
    assert!(matches!(stack[n - 1], Value::Boolean(true)));
}

#[test]
fn test_procedure_literal_pushes_value() {
    let (_, stack) = run(b"{ 1 2 add }");
    assert!(matches!(&stack[0], Value::Procedure(body) if body.len() == 3));
}

// ============================================================================
// Graphics
// ============================================================================

#[test]
fn test_curveto_segment() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(b"0 0 moveto 10 20 30 40 50 60 curveto")
        .unwrap();
    assert_eq!(
        interp.gstate().path[1],
        PathSegment::CurveTo((10.0, 20.0), (30.0, 40.0), (50.0, 60.0))
    );
    assert_eq!(interp.gstate().current_point, (50.0, 60.0));
}

#[test]
fn test_fill_clears_path() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp
        .execute(b"0 0 moveto 10 0 lineto 10 10 lineto closepath fill")
        .unwrap();
    assert!(interp.gstate().path.is_empty());
    assert!(matches!(device.events[0], Event::Fill { ref path } if path.len() == 4));
}

#[test]
fn test_showpage_keeps_graphics_stack() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"gsave showpage").unwrap();
    assert_eq!(interp.graphics_depth(), 2);
    assert!(matches!(device.events[0], Event::ShowPage));
}

#[test]
fn test_translate() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"10 20 translate").unwrap();
    assert_eq!(interp.gstate().ctm, [1.0, 0.0, 0.0, 1.0, 10.0, 20.0]);

    // Translation composes through the existing transform.
    interp.execute(b"2 3 scale 10 0 translate").unwrap();
    let ctm = interp.gstate().ctm;
    assert_eq!(ctm[4], 30.0);
    assert_eq!(ctm[5], 20.0);
}

#[test]
fn test_scale() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"2 3 scale").unwrap();
    assert_eq!(interp.gstate().ctm, [2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
}

#[test]
fn test_rotate_90_degrees() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"90 rotate").unwrap();
    let [a, b, c, d, e, f] = interp.gstate().ctm;
    assert!(a.abs() < 1e-12);
    assert!((b - -1.0).abs() < 1e-12);
    assert!((c - 1.0).abs() < 1e-12);
    assert!(d.abs() < 1e-12);
    assert_eq!((e, f), (0.0, 0.0));
}

#[test]
fn test_concat_matrix() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"[2 0 0 2 5 7] concat").unwrap();
    assert_eq!(interp.gstate().ctm, [2.0, 0.0, 0.0, 2.0, 5.0, 7.0]);
}

#[test]
fn test_setgray() {
    let mut device = RecordingDevice::default();
    let mut interp = PsInterpreter::new(&mut device);
    interp.execute(b"0.5 setgray").unwrap();
    assert_eq!(interp.gstate().rgb, (0.5, 0.5, 0.5));
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn test_unknown_token_becomes_string() {
    let (_, stack) = run(b"mystery");
    assert!(matches!(&stack[0], Value::String(s) if s == "mystery"));
}

#[test]
fn test_show_of_non_string_prints_display_form() {
    let (device, _) = run(b"3.5 show true show");
    assert_eq!(device.text, b"3.5true");
}
