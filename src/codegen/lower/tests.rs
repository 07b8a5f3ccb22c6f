use super::*;
use crate::codegen::fragment::Shape;
use crate::codegen::{generate, render_program};
use crate::semantic::analyze;
use crate::semantic::signatures::{Signature, SignatureRegistry};
use crate::semantic::typed::ExprKind;
use crate::span::Span;
use crate::syntax::parse_source;
use crate::types::Ty;

fn typed(source: &str) -> TypedProgram {
    let program = parse_source(source, 32).unwrap_or_else(|e| panic!("parse errors: {:?}", e));
    analyze(&program, &SignatureRegistry::new())
        .unwrap_or_else(|e| panic!("semantic errors: {:?}", e))
}

/// Value code for the initializer of `const x := <expr>.`
fn value(expr: &str) -> Vec<Instruction> {
    let program = typed(&format!("exec {{ const x := {}. }}", expr));
    let TypedStmt::Declaration { value, .. } = &program.body.statements[0].node else {
        panic!("expected declaration");
    };
    let code = Lowerer::new().lower_value(value).unwrap();
    assert!(code.is_value());
    code.into_instructions()
}

/// Code for the main block only.
fn body(source: &str) -> CodeFragment {
    let program = typed(source);
    Lowerer::new().lower_block(&program.body).unwrap()
}

fn op(opcode: Opcode) -> Instruction {
    Instruction::new(opcode)
}

fn push(n: i32) -> Instruction {
    Instruction::int(Opcode::PushI, n)
}

fn jump(opcode: Opcode, target: &str) -> Instruction {
    Instruction::label(opcode, target)
}

fn label(name: &str) -> Instruction {
    Instruction::label(Opcode::Label, name)
}

fn count(code: &[Instruction], opcode: Opcode) -> usize {
    code.iter().filter(|i| i.opcode == opcode).count()
}

#[test]
fn test_integer_addition() {
    assert_eq!(value("1 + 2"), vec![push(1), push(2), op(Opcode::Add)]);
}

#[test]
fn test_float_arithmetic_uses_float_opcodes() {
    assert_eq!(
        value("1.5 * 2.0"),
        vec![
            Instruction::float(Opcode::PushF, 1.5),
            Instruction::float(Opcode::PushF, 2.0),
            op(Opcode::FMultiply),
        ]
    );
}

#[test]
fn test_and_short_circuits() {
    assert_eq!(
        value("true && false"),
        vec![
            push(1),
            op(Opcode::Duplicate),
            jump(Opcode::JumpFalse, "-boolean-1-join"),
            push(0),
            op(Opcode::And),
            label("-boolean-1-join"),
        ]
    );
}

#[test]
fn test_left_chain_shares_one_join_label() {
    let code = value("true && false && true && false");
    assert_eq!(count(&code, Opcode::Label), 1);
    assert_eq!(count(&code, Opcode::JumpFalse), 3);
    assert!(code
        .iter()
        .filter(|i| i.opcode == Opcode::JumpFalse)
        .all(|i| *i == jump(Opcode::JumpFalse, "-boolean-1-join")));
    assert_eq!(code.last(), Some(&label("-boolean-1-join")));
}

#[test]
fn test_mixed_logical_operators_get_their_own_joins() {
    assert_eq!(
        value("true && false || true"),
        vec![
            push(1),
            op(Opcode::Duplicate),
            jump(Opcode::JumpFalse, "-boolean-2-join"),
            push(0),
            op(Opcode::And),
            label("-boolean-2-join"),
            op(Opcode::Duplicate),
            jump(Opcode::JumpTrue, "-boolean-1-join"),
            push(1),
            op(Opcode::Or),
            label("-boolean-1-join"),
        ]
    );
}

#[test]
fn test_right_nested_chain_places_its_own_join() {
    let code = value("true || (false || true)");
    assert_eq!(count(&code, Opcode::Label), 2);
    assert_eq!(code.last(), Some(&label("-boolean-1-join")));
}

#[test]
fn test_comparison_branches_on_difference() {
    assert_eq!(
        value("3 > 2"),
        vec![
            push(3),
            push(2),
            op(Opcode::Subtract),
            jump(Opcode::JumpPos, "-compare-1-true"),
            jump(Opcode::Jump, "-compare-1-false"),
            label("-compare-1-true"),
            push(1),
            jump(Opcode::Jump, "-compare-1-join"),
            label("-compare-1-false"),
            push(0),
            jump(Opcode::Jump, "-compare-1-join"),
            label("-compare-1-join"),
        ]
    );
}

#[test]
fn test_comparison_jump_selection() {
    let code = value("1.0 <= 2.0");
    assert_eq!(code[2], op(Opcode::FSubtract));
    assert_eq!(code[3], jump(Opcode::JumpFPos, "-compare-1-false"));
    assert_eq!(code[4], jump(Opcode::Jump, "-compare-1-true"));

    let code = value("^a^ != ^b^");
    assert_eq!(code[2], op(Opcode::Subtract));
    assert_eq!(code[3], jump(Opcode::JumpFalse, "-compare-1-false"));

    let code = value("1 >= 2");
    assert_eq!(code[3], jump(Opcode::JumpNeg, "-compare-1-false"));
}

#[test]
fn test_boolean_equality_uses_xor() {
    let code = value("true == false");
    assert_eq!(code[..3], [push(1), push(0), op(Opcode::BTXor)]);
    assert_eq!(code[3], jump(Opcode::JumpFalse, "-compare-1-true"));
    assert_eq!(count(&code, Opcode::Subtract), 0);
}

#[test]
fn test_divisor_checked_before_divide() {
    assert_eq!(
        value("6 / 3"),
        vec![
            push(6),
            push(3),
            op(Opcode::Duplicate),
            jump(Opcode::JumpFalse, "$$i-divide-by-zero"),
            op(Opcode::Divide),
        ]
    );
    let code = value("1.0 / 4.0");
    assert_eq!(code[2], op(Opcode::Duplicate));
    assert_eq!(code[3], jump(Opcode::JumpFZero, "$$f-divide-by-zero"));
    assert_eq!(code[4], op(Opcode::FDivide));
}

#[test]
fn test_casts() {
    assert_eq!(value("[1 | int]"), vec![push(1)]);
    assert_eq!(value("[^a^ | int]"), vec![push(97)]);
    assert_eq!(
        value("[65 | char]"),
        vec![push(65), push(127), op(Opcode::BTAnd)]
    );
    assert_eq!(value("[2 | float]"), vec![push(2), op(Opcode::ConvertF)]);
    assert_eq!(
        value("[2.5 | int]"),
        vec![Instruction::float(Opcode::PushF, 2.5), op(Opcode::ConvertI)]
    );

    let code = value("[7 | bool]");
    assert_eq!(code[0], push(7));
    assert_eq!(code[1], jump(Opcode::JumpFalse, "-cast-to-bool-1-false"));
    assert_eq!(code.len(), 7);
}

#[test]
fn test_not() {
    assert_eq!(value("!true"), vec![push(1), op(Opcode::BNegate)]);
}

#[test]
fn test_string_constant_record() {
    assert_eq!(
        value("\"hi\""),
        vec![
            Instruction::label(Opcode::DLabel, "-stringConstant-1-x"),
            Instruction::int(Opcode::DataI, 6),
            Instruction::int(Opcode::DataI, 9),
            Instruction::int(Opcode::DataI, 2),
            Instruction::string(Opcode::DataS, "hi"),
            Instruction::label(Opcode::PushD, "-stringConstant-1-x"),
        ]
    );
}

#[test]
fn test_identifier_loads_by_type() {
    let program = typed("exec { const a := 2.5. const b := a. }");
    let TypedStmt::Declaration { value, .. } = &program.body.statements[1].node else {
        panic!("expected declaration");
    };
    let mut lowerer = Lowerer::new();
    assert!(lowerer.lower_expr(value).unwrap().is_address());
    assert_eq!(
        lowerer.lower_value(value).unwrap().into_instructions(),
        vec![
            Instruction::label(Opcode::PushD, "$global-memory-block").with_comment("a"),
            push(0),
            op(Opcode::Add),
            op(Opcode::LoadF),
        ]
    );
}

#[test]
fn test_declaration_stores_at_offset() {
    let code = body("exec { const i := 1. var c := ^a^. }");
    assert!(code.is_void());
    assert_eq!(
        code.instructions()[5..],
        [
            Instruction::label(Opcode::PushD, "$global-memory-block").with_comment("c"),
            push(4),
            op(Opcode::Add),
            push(97),
            op(Opcode::StoreC),
        ]
    );
}

#[test]
fn test_assignment_stores() {
    let code = body("exec { var f := 1.0. f := f + 1.0. }");
    assert_eq!(code.instructions().last(), Some(&op(Opcode::StoreF)));
    assert_eq!(count(code.instructions(), Opcode::LoadF), 1);
}

#[test]
fn test_print_boolean_selects_text() {
    assert_eq!(
        body("exec { print true. }").into_instructions(),
        vec![
            push(1),
            jump(Opcode::JumpTrue, "-print-boolean-1-true"),
            jump(Opcode::PushD, "$boolean-false-string"),
            jump(Opcode::Jump, "-print-boolean-1-join"),
            label("-print-boolean-1-true"),
            jump(Opcode::PushD, "$boolean-true-string"),
            label("-print-boolean-1-join"),
            jump(Opcode::PushD, "$print-format-boolean"),
            op(Opcode::Printf),
        ]
    );
}

#[test]
fn test_print_string_skips_header() {
    let code = body("exec { print \"ok\". }").into_instructions();
    assert_eq!(
        code[5..],
        [
            jump(Opcode::PushD, "-stringConstant-1-"),
            push(12),
            op(Opcode::Add),
            jump(Opcode::PushD, "$print-format-string"),
            op(Opcode::Printf),
        ]
    );
}

#[test]
fn test_print_separators() {
    assert_eq!(
        body("exec { print 5, _n_ _t_. }").into_instructions(),
        vec![
            push(5),
            jump(Opcode::PushD, "$print-format-integer"),
            op(Opcode::Printf),
            jump(Opcode::PushD, "$print-format-newline"),
            op(Opcode::Printf),
            jump(Opcode::PushD, "$print-format-tab"),
            op(Opcode::Printf),
        ]
    );
}

#[test]
fn test_error_node_is_rejected() {
    let err = Lowerer::new()
        .lower_expr(&TypedExpr::error(Span::new(3, 7)))
        .unwrap_err();
    assert_eq!(err, CodegenError::ErrorNode { span: Span::new(3, 7) });
}

#[test]
fn test_null_signature_is_rejected() {
    let operand = TypedExpr::new(ExprKind::IntConst(1), Ty::Integer, Span::new(0, 1));
    let expr = TypedExpr::new(
        ExprKind::Unary {
            op: crate::ast::UnOp::Not,
            operand: Box::new(operand),
            signature: Signature::null().clone(),
        },
        Ty::Boolean,
        Span::new(0, 2),
    );
    let err = Lowerer::new().lower_value(&expr).unwrap_err();
    assert!(matches!(err, CodegenError::NullSignature { .. }));
}

#[test]
fn test_program_layout() {
    let code = generate(&typed("exec { const a := 1. print a. }")).unwrap();
    assert_eq!(code[0], jump(Opcode::Jump, "$$main"));

    let main = code.iter().position(|i| *i == label("$$main")).unwrap();
    assert_eq!(
        code[main - 2..main],
        [
            Instruction::label(Opcode::DLabel, "$global-memory-block"),
            Instruction::int(Opcode::DataZ, 4),
        ]
    );
    assert_eq!(
        code.last(),
        Some(&op(Opcode::Halt).with_comment("End of Execution"))
    );
}

#[test]
fn test_generation_is_deterministic() {
    let program = typed("exec { var b := 1 < 2 && 3 > 2. print b, [b | bool] || false. }");
    let first = generate(&program).unwrap();
    let second = generate(&program).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        render_program(&first, true),
        render_program(&second, true)
    );
}

#[test]
fn test_append_shape_error_names_node() {
    let mut value = CodeFragment::value();
    let err = value.append(CodeFragment::void()).unwrap_err();
    let err = err.at("print statement", Span::new(1, 2));
    assert_eq!(
        err,
        CodegenError::ShapeMismatch {
            expected: Shape::Value,
            found: Shape::Void,
            node: "print statement".to_string(),
            span: Span::new(1, 2),
        }
    );
}
