//! Tests for quadruple lowering

use crate::function::{lower_function, lower_main};
use crate::*;
use c0c_ast::builder::*;
use c0c_ast::{BinaryOp, CompareOp, GlobalDecl, LocalDecl, Program, TypedBlock, TypedStmt};
use c0c_codegen::{Address, AsmInst, CallingConvention, Reg};
use c0c_common::Type;
use c0c_ir::{generate_program, FunctionContext, GeneratorOptions, IrModule};
use pretty_assertions::assert_eq;

fn plain() -> BackendOptions {
    BackendOptions {
        annotate: false,
        ..BackendOptions::default()
    }
}

fn ir(globals: Vec<GlobalDecl>, functions: Vec<c0c_ast::Function>) -> IrModule {
    generate_program(&Program { globals, functions }, &GeneratorOptions::default()).unwrap()
}

fn abs_program() -> IrModule {
    let a = local("a", 1, Type::Int);
    let abs = function(
        "abs",
        Type::Int,
        vec![a.clone()],
        TypedBlock {
            decls: vec![],
            stmts: vec![
                TypedStmt::If {
                    condition: compare(CompareOp::Lt, var(&a), int(0)),
                    then_stmt: Box::new(TypedStmt::Return(Some(neg(var(&a))))),
                    else_stmt: None,
                },
                TypedStmt::Return(Some(var(&a))),
            ],
        },
    );
    let main = function(
        "main",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![],
            stmts: vec![print_value(call(&abs, vec![int(-5)]))],
        },
    );
    ir(vec![], vec![abs, main])
}

fn sp(offset: i32) -> Address {
    Address::Offset(offset, Reg::Sp)
}

fn label(name: &str) -> String {
    name.to_string()
}

#[test]
fn test_leaf_function_uses_bound_registers() {
    let module = abs_program();
    let code = lower_function(module.function("abs").unwrap(), &plain()).unwrap();
    assert_eq!(
        code,
        vec![
            AsmInst::Label(label("$func_abs_entry")),
            AsmInst::Addiu(Reg::Sp, Reg::Sp, -8),
            AsmInst::Sw(Reg::S0, sp(4)),
            AsmInst::Lw(Reg::S0, sp(8)),
            AsmInst::Li(Reg::T9, 0),
            AsmInst::Bge(Reg::S0, Reg::T9, label("$BB_0")),
            AsmInst::Subu(Reg::T8, Reg::Zero, Reg::S0),
            AsmInst::Sw(Reg::T8, sp(0)),
            AsmInst::Lw(Reg::V0, sp(0)),
            AsmInst::J(label("$func_abs_exit")),
            AsmInst::Label(label("$BB_0")),
            AsmInst::Move(Reg::V0, Reg::S0),
            AsmInst::J(label("$func_abs_exit")),
            AsmInst::Label(label("$func_abs_exit")),
            AsmInst::Lw(Reg::S0, sp(4)),
            AsmInst::Addiu(Reg::Sp, Reg::Sp, 8),
            AsmInst::Jr(Reg::Ra),
        ]
    );
}

#[test]
fn test_main_is_inline_and_exits() {
    let module = abs_program();
    let code = lower_main(module.main().unwrap(), &plain()).unwrap();
    assert_eq!(
        code,
        vec![
            AsmInst::Addiu(Reg::Sp, Reg::Sp, -12),
            AsmInst::Li(Reg::T8, -5),
            AsmInst::Sw(Reg::T8, sp(0)),
            AsmInst::Jal(label("$func_abs_entry")),
            AsmInst::Sw(Reg::V0, sp(4)),
            AsmInst::Lw(Reg::A0, sp(4)),
            AsmInst::Li(Reg::V0, 1),
            AsmInst::Syscall,
            AsmInst::La(Reg::A0, label("strlabel_0")),
            AsmInst::Li(Reg::V0, 4),
            AsmInst::Syscall,
            AsmInst::Li(Reg::V0, 10),
            AsmInst::Syscall,
        ]
    );
}

#[test]
fn test_main_comes_first_in_text() {
    let module = abs_program();
    let program = lower_module(&module, &plain()).unwrap();
    assert_eq!(program.text[0], AsmInst::Addiu(Reg::Sp, Reg::Sp, -12));
    let entry = program
        .text
        .iter()
        .position(|i| *i == AsmInst::Label(label("$func_abs_entry")))
        .unwrap();
    assert_eq!(program.text[entry - 1], AsmInst::Syscall);
    assert_eq!(program.data.len(), 1);
}

#[test]
fn test_annotated_assembly_text() {
    let module = abs_program();
    let text = compile_to_assembly(&module, &BackendOptions::default()).unwrap();
    assert!(text.starts_with("# MIPS assembly generated by c0c\n.data\n"));
    assert!(text.contains("    strlabel_0: .asciiz \"\\n\"\n"));
    assert!(text.contains("    # ret @T0(0) (to $func_abs_exit)\n"));
    assert!(text.contains("\n$func_abs_entry:\n"));
    assert!(text.contains("    jal $func_abs_entry\n"));
}

#[test]
fn test_inline_epilogue_replaces_exit_jumps() {
    let module = abs_program();
    let options = BackendOptions {
        inline_epilogue: true,
        ..plain()
    };
    let code = lower_function(module.function("abs").unwrap(), &options).unwrap();
    assert!(!code.iter().any(|i| matches!(i, AsmInst::J(_))));
    assert_eq!(code.iter().filter(|i| **i == AsmInst::Jr(Reg::Ra)).count(), 3);
}

#[test]
fn test_global_array_access() {
    let g = global("g", 1, Type::array_of(Type::Int, 3));
    let main = function(
        "main",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![],
            stmts: vec![expr_stmt(assign(index(&g, int(1)), int(7))), print_value(index(&g, int(1)))],
        },
    );
    let module = ir(vec![GlobalDecl { symbol: g, const_value: None }], vec![main]);
    let code = lower_main(module.main().unwrap(), &plain()).unwrap();
    assert_eq!(
        &code[..10],
        &[
            AsmInst::Addiu(Reg::Sp, Reg::Sp, -4),
            AsmInst::Li(Reg::T8, 7),
            AsmInst::Li(Reg::T9, 1),
            AsmInst::Sll(Reg::T9, Reg::T9, 2),
            AsmInst::Sw(Reg::T8, Address::Indexed(label("g"), Reg::T9)),
            AsmInst::Li(Reg::T8, 1),
            AsmInst::Sll(Reg::T8, Reg::T8, 2),
            AsmInst::Lw(Reg::T8, Address::Indexed(label("g"), Reg::T8)),
            AsmInst::Sw(Reg::T8, sp(0)),
            AsmInst::Lw(Reg::A0, sp(0)),
        ]
    );
}

#[test]
fn test_local_array_store_adds_stack_pointer() {
    let arr = local("arr", 1, Type::array_of(Type::Int, 2));
    let main = function(
        "main",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![LocalDecl { symbol: arr.clone(), const_value: None }],
            stmts: vec![expr_stmt(assign(index(&arr, int(1)), int(5)))],
        },
    );
    let module = ir(vec![], vec![main]);
    let code = lower_main(module.main().unwrap(), &plain()).unwrap();
    assert_eq!(
        code,
        vec![
            AsmInst::Addiu(Reg::Sp, Reg::Sp, -8),
            AsmInst::Li(Reg::T8, 5),
            AsmInst::Li(Reg::T9, 1),
            AsmInst::Sll(Reg::T9, Reg::T9, 2),
            AsmInst::Addiu(Reg::T9, Reg::T9, 0),
            AsmInst::Addu(Reg::T9, Reg::T9, Reg::Sp),
            AsmInst::Sw(Reg::T8, Address::Offset(0, Reg::T9)),
            AsmInst::Li(Reg::V0, 10),
            AsmInst::Syscall,
        ]
    );
}

#[test]
fn test_non_leaf_function_ignores_bindings() {
    let callee = function("callee", Type::Void, vec![], TypedBlock::default());
    let x = local("x", 1, Type::Int);
    let f = function(
        "f",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![LocalDecl { symbol: x.clone(), const_value: None }],
            stmts: vec![
                expr_stmt(assign(var(&x), binary(BinaryOp::Add, var(&x), int(1)))),
                expr_stmt(call(&callee, vec![])),
            ],
        },
    );
    let main = function("main", Type::Void, vec![], TypedBlock::default());
    let module = ir(vec![], vec![callee, f, main]);
    let f = module.function("f").unwrap();
    assert!(f.binding(f.lookup(1).unwrap()).is_some());

    let code = lower_function(f, &plain()).unwrap();
    let pool: Vec<String> = CallingConvention::SAVED_POOL.iter().map(|r| r.to_string()).collect();
    let uses_pool = code
        .iter()
        .any(|inst| pool.iter().any(|reg| inst.to_string().contains(reg.as_str())));
    assert!(!uses_pool, "{:?}", code);
    assert!(code.contains(&AsmInst::Sw(Reg::Ra, sp(f.frame.size - 4))));
    assert!(code.contains(&AsmInst::Jal(label("$func_callee_entry"))));
}

#[test]
fn test_register_arguments_skip_the_stack() {
    let module = abs_program();
    let options = BackendOptions {
        reg_args: true,
        ..plain()
    };

    let main = lower_main(module.main().unwrap(), &options).unwrap();
    assert_eq!(
        main[..3],
        [
            AsmInst::Addiu(Reg::Sp, Reg::Sp, -12),
            AsmInst::Li(Reg::A0, -5),
            AsmInst::Jal(label("$func_abs_entry")),
        ]
    );

    let abs = lower_function(module.function("abs").unwrap(), &options).unwrap();
    assert_eq!(abs[3], AsmInst::Move(Reg::S0, Reg::A0));
    assert!(!abs.contains(&AsmInst::Lw(Reg::S0, sp(8))));
}

#[test]
fn test_register_argument_spills_in_non_leaf_function() {
    let callee = function("callee", Type::Void, vec![], TypedBlock::default());
    let n = local("n", 1, Type::Int);
    let f = function(
        "f",
        Type::Void,
        vec![n.clone()],
        TypedBlock {
            decls: vec![],
            stmts: vec![expr_stmt(call(&callee, vec![])), print_value(var(&n))],
        },
    );
    let main = function("main", Type::Void, vec![], TypedBlock::default());
    let module = ir(vec![], vec![callee, f, main]);
    let f = module.function("f").unwrap();
    let options = BackendOptions {
        reg_args: true,
        ..plain()
    };

    let code = lower_function(f, &options).unwrap();
    assert!(code.contains(&AsmInst::Sw(Reg::A0, sp(f.frame.size))), "{:?}", code);
    assert!(code.contains(&AsmInst::Lw(Reg::A0, sp(f.frame.size))), "{:?}", code);
}

#[test]
fn test_scan_and_print_char() {
    let c = global("c", 1, Type::Char);
    let main = function(
        "main",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![],
            stmts: vec![TypedStmt::Scan(vec![c.clone()]), print_value(var(&c))],
        },
    );
    let module = ir(vec![GlobalDecl { symbol: c, const_value: None }], vec![main]);
    let code = lower_main(module.main().unwrap(), &plain()).unwrap();
    assert_eq!(
        &code[..6],
        &[
            AsmInst::Li(Reg::V0, 12),
            AsmInst::Syscall,
            AsmInst::Sw(Reg::V0, Address::Label(label("c"))),
            AsmInst::Lw(Reg::A0, Address::Label(label("c"))),
            AsmInst::Li(Reg::V0, 11),
            AsmInst::Syscall,
        ]
    );
}

#[test]
fn test_division_uses_lo() {
    let x = local("x", 1, Type::Int);
    let main = function(
        "main",
        Type::Void,
        vec![],
        TypedBlock {
            decls: vec![LocalDecl { symbol: x.clone(), const_value: None }],
            stmts: vec![expr_stmt(assign(var(&x), binary(BinaryOp::Div, var(&x), int(2))))],
        },
    );
    let module = ir(vec![], vec![main]);
    let code = lower_main(module.main().unwrap(), &plain()).unwrap();
    assert!(code.contains(&AsmInst::Div(Reg::S0, Reg::T9)));
    assert!(code.contains(&AsmInst::Mflo(Reg::T8)));
}

#[test]
fn test_errors() {
    let empty = IrModule {
        functions: vec![],
        data: vec![],
    };
    assert_eq!(lower_module(&empty, &plain()).unwrap_err(), CodegenError::MissingMain);

    let unresolved = FunctionContext::new("f", Type::Void);
    assert_eq!(
        lower_function(&unresolved, &plain()).unwrap_err(),
        CodegenError::UnresolvedFrame {
            function: "f".to_string()
        }
    );
}
