//! End-to-end programs: generate IR, lower to MIPS, run on the simulator.

use c0c_ast::builder::*;
use c0c_ast::{
    BinaryOp, CompareOp, Condition, ForInit, ForStep, Function, GlobalDecl, LocalDecl, Program, Symbol,
    TypedBlock, TypedStmt,
};
use c0c_backend::{lower_module, BackendOptions};
use c0c_codegen::{Address, AsmInst, AsmProgram, Reg};
use c0c_common::Type;
use c0c_ir::{generate_program, GeneratorOptions, IrModule, OperandKind, QuadOp};
use c0c_sim::{run_program, StopReason};
use pretty_assertions::assert_eq;

fn compile(program: &Program, generator: &GeneratorOptions, backend: &BackendOptions) -> (IrModule, String, u64) {
    let module = generate_program(program, generator).unwrap();
    let asm = lower_module(&module, backend).unwrap();
    let outcome = run_program(&asm, "").unwrap();
    assert_eq!(outcome.stop, StopReason::Exit);
    (module, outcome.output, outcome.steps)
}

fn run(program: &Program) -> String {
    compile(program, &GeneratorOptions::default(), &BackendOptions::default()).1
}

fn run_with_input(program: &Program, input: &str) -> String {
    let module = generate_program(program, &GeneratorOptions::default()).unwrap();
    let asm = lower_module(&module, &BackendOptions::default()).unwrap();
    run_program(&asm, input).unwrap().output
}

fn reg_args() -> BackendOptions {
    BackendOptions {
        reg_args: true,
        ..BackendOptions::default()
    }
}

fn compile_asm(
    program: &Program,
    generator: &GeneratorOptions,
    backend: &BackendOptions,
) -> (AsmProgram, String) {
    let module = generate_program(program, generator).unwrap();
    let asm = lower_module(&module, backend).unwrap();
    let outcome = run_program(&asm, "").unwrap();
    assert_eq!(outcome.stop, StopReason::Exit);
    (asm, outcome.output)
}

fn decls(symbols: &[&Symbol]) -> Vec<LocalDecl> {
    symbols
        .iter()
        .map(|s| LocalDecl {
            symbol: (*s).clone(),
            const_value: None,
        })
        .collect()
}

fn body(decls: Vec<LocalDecl>, stmts: Vec<TypedStmt>) -> TypedBlock {
    TypedBlock { decls, stmts }
}

fn main_fn(decls: Vec<LocalDecl>, stmts: Vec<TypedStmt>) -> Function {
    function("main", Type::Void, vec![], body(decls, stmts))
}

fn text(s: &str) -> TypedStmt {
    TypedStmt::Print {
        text: Some(s.to_string()),
        value: None,
    }
}

fn abs_fn() -> Function {
    let a = local("a", 1, Type::Int);
    function(
        "abs",
        Type::Int,
        vec![a.clone()],
        body(
            vec![],
            vec![
                TypedStmt::If {
                    condition: compare(CompareOp::Lt, var(&a), int(0)),
                    then_stmt: Box::new(TypedStmt::Return(Some(neg(var(&a))))),
                    else_stmt: None,
                },
                TypedStmt::Return(Some(var(&a))),
            ],
        ),
    )
}

fn add_fn() -> Function {
    let a = local("a", 1, Type::Int);
    let b = local("b", 2, Type::Int);
    function(
        "add",
        Type::Int,
        vec![a.clone(), b.clone()],
        body(vec![], vec![TypedStmt::Return(Some(binary(BinaryOp::Add, var(&a), var(&b))))]),
    )
}

fn fact_fn() -> Function {
    let n = local("n", 1, Type::Int);
    let fact_ref = function("fact", Type::Int, vec![n.clone()], TypedBlock::default());
    function(
        "fact",
        Type::Int,
        vec![n.clone()],
        body(
            vec![],
            vec![
                TypedStmt::If {
                    condition: compare(CompareOp::Le, var(&n), int(1)),
                    then_stmt: Box::new(TypedStmt::Return(Some(int(1)))),
                    else_stmt: None,
                },
                TypedStmt::Return(Some(binary(
                    BinaryOp::Mul,
                    var(&n),
                    call(&fact_ref, vec![binary(BinaryOp::Sub, var(&n), int(1))]),
                ))),
            ],
        ),
    )
}

#[test]
fn test_abs_of_negative_five() {
    let abs = abs_fn();
    let main = main_fn(vec![], vec![print_value(call(&abs, vec![neg(int(5))]))]);
    let program = Program {
        globals: vec![],
        functions: vec![abs, main],
    };
    let (module, output, _) = compile(&program, &GeneratorOptions::default(), &BackendOptions::default());
    assert_eq!(output, "5\n");

    let abs = module.function("abs").unwrap();
    assert_eq!(abs.quads.iter().filter(|q| q.op == QuadOp::Neg).count(), 1);
    assert_eq!(abs.quads.iter().filter(|q| q.op.is_branch()).count(), 1);
}

#[test]
fn test_abs_of_positive_value() {
    let abs = abs_fn();
    let main = main_fn(vec![], vec![print_value(call(&abs, vec![int(7)]))]);
    let program = Program {
        globals: vec![],
        functions: vec![abs, main],
    };
    assert_eq!(run(&program), "7\n");
}

#[test]
fn test_global_array_element() {
    let g = global("g", 10, Type::array_of(Type::Int, 3));
    let main = main_fn(
        vec![],
        vec![expr_stmt(assign(index(&g, int(1)), int(7))), print_value(index(&g, int(1)))],
    );
    let program = Program {
        globals: vec![GlobalDecl {
            symbol: g,
            const_value: None,
        }],
        functions: vec![main],
    };
    let (module, output, _) = compile(&program, &GeneratorOptions::default(), &BackendOptions::default());
    assert_eq!(output, "7\n");
    assert_eq!(module.data[0].label, "g");
    assert_eq!(module.data[0].size_in_bytes(), 12);

    let main = module.main().unwrap();
    let stores = main
        .quads
        .iter()
        .filter(|q| q.op == QuadOp::Assign)
        .filter(|q| {
            matches!(
                main.operand(q.dst.unwrap()).kind,
                OperandKind::ArrayElement { is_lvalue: true, .. }
            )
        })
        .count();
    assert_eq!(stores, 1);
}

fn countdown(start: i32) -> Program {
    let n = local("n", 1, Type::Int);
    let count = local("count", 2, Type::Int);
    let main = main_fn(
        decls(&[&n, &count]),
        vec![
            expr_stmt(assign(var(&n), int(start))),
            expr_stmt(assign(var(&count), int(0))),
            TypedStmt::While {
                condition: compare(CompareOp::Gt, var(&n), int(0)),
                body: Box::new(TypedStmt::Compound(vec![
                    expr_stmt(assign(var(&n), binary(BinaryOp::Sub, var(&n), int(1)))),
                    expr_stmt(assign(var(&count), binary(BinaryOp::Add, var(&count), int(1)))),
                ])),
            },
            print_value(var(&count)),
        ],
    );
    Program {
        globals: vec![],
        functions: vec![main],
    }
}

#[test]
fn test_while_loop_runs_body_three_times() {
    assert_eq!(run(&countdown(3)), "3\n");
    assert_eq!(run(&countdown(0)), "0\n");

    let stack_only = GeneratorOptions {
        leaf_registers: false,
        ..GeneratorOptions::default()
    };
    let (_, output, _) = compile(&countdown(3), &stack_only, &BackendOptions::default());
    assert_eq!(output, "3\n");
}

#[test]
fn test_loop_condition_with_call_runs_once_per_test() {
    let calls = global("calls", 1, Type::Int);
    let n = global("n", 2, Type::Int);
    let tick = function(
        "tick",
        Type::Int,
        vec![],
        body(
            vec![],
            vec![
                expr_stmt(assign(var(&calls), binary(BinaryOp::Add, var(&calls), int(1)))),
                TypedStmt::Return(Some(var(&n))),
            ],
        ),
    );
    let main = main_fn(
        vec![],
        vec![
            expr_stmt(assign(var(&n), int(3))),
            TypedStmt::While {
                condition: compare(CompareOp::Gt, call(&tick, vec![]), int(0)),
                body: Box::new(expr_stmt(assign(var(&n), binary(BinaryOp::Sub, var(&n), int(1))))),
            },
            print_value(var(&calls)),
        ],
    );
    let program = Program {
        globals: [calls, n]
            .into_iter()
            .map(|symbol| GlobalDecl {
                symbol,
                const_value: None,
            })
            .collect(),
        functions: vec![tick, main],
    };
    let (module, output, _) = compile(&program, &GeneratorOptions::default(), &BackendOptions::default());
    assert_eq!(output, "4\n");

    let main = module.main().unwrap();
    assert_eq!(main.quads.iter().filter(|q| q.op == QuadOp::Call).count(), 2);
}

#[test]
fn test_loop_work_grows_with_iterations() {
    let options = (GeneratorOptions::default(), BackendOptions::default());
    let (_, _, three) = compile(&countdown(3), &options.0, &options.1);
    let (_, _, four) = compile(&countdown(4), &options.0, &options.1);
    let (_, _, five) = compile(&countdown(5), &options.0, &options.1);
    assert!(four > three);
    assert_eq!(five - four, four - three);
}

#[test]
fn test_two_argument_call() {
    let add = add_fn();
    let main = main_fn(
        vec![],
        vec![TypedStmt::Print {
            text: Some("sum=".to_string()),
            value: Some(call(&add, vec![int(2), int(40)])),
        }],
    );
    let program = Program {
        globals: vec![],
        functions: vec![add, main],
    };
    let (module, output, _) = compile(&program, &GeneratorOptions::default(), &BackendOptions::default());
    assert_eq!(output, "sum=42\n");

    let main = module.main().unwrap();
    let slots: Vec<i32> = main
        .quads
        .iter()
        .filter(|q| q.op == QuadOp::Push)
        .map(|q| main.operand(q.arg2.unwrap()).offset)
        .collect();
    assert_eq!(slots, vec![0, 4]);
    assert!(!main.is_leaf());
}

#[test]
fn test_two_argument_call_in_registers() {
    let add = add_fn();
    let main = main_fn(
        vec![],
        vec![TypedStmt::Print {
            text: Some("sum=".to_string()),
            value: Some(call(&add, vec![int(2), int(40)])),
        }],
    );
    let program = Program {
        globals: vec![],
        functions: vec![add, main],
    };
    let (asm, output) = compile_asm(&program, &GeneratorOptions::default(), &reg_args());
    assert_eq!(output, "sum=42\n");
    assert!(asm.text.contains(&AsmInst::Li(Reg::A0, 2)));
    assert!(asm.text.contains(&AsmInst::Li(Reg::A1, 40)));
    assert!(asm.text.contains(&AsmInst::Move(Reg::S0, Reg::A0)));
    assert!(asm.text.contains(&AsmInst::Move(Reg::S1, Reg::A1)));

    let stack_only = GeneratorOptions {
        leaf_registers: false,
        ..GeneratorOptions::default()
    };
    let (asm, output) = compile_asm(&program, &stack_only, &reg_args());
    assert_eq!(output, "sum=42\n");
    assert!(!asm.text.iter().any(|inst| matches!(inst, AsmInst::Move(_, Reg::A0))));
}

#[test]
fn test_fifth_argument_stays_on_stack() {
    let params: Vec<Symbol> = ["a", "b", "c", "d", "e"]
        .iter()
        .zip(1..)
        .map(|(name, id)| local(name, id, Type::Int))
        .collect();
    let difference = params[1..]
        .iter()
        .fold(var(&params[0]), |acc, p| binary(BinaryOp::Sub, acc, var(p)));
    let diff = function(
        "diff",
        Type::Int,
        params.clone(),
        body(vec![], vec![TypedStmt::Return(Some(difference))]),
    );
    let main = main_fn(
        vec![],
        vec![print_value(call(&diff, vec![int(100), int(1), int(2), int(3), int(4)]))],
    );
    let program = Program {
        globals: vec![],
        functions: vec![diff, main],
    };
    assert_eq!(run(&program), "90\n");

    let (asm, output) = compile_asm(&program, &GeneratorOptions::default(), &reg_args());
    assert_eq!(output, "90\n");
    assert!(asm.text.contains(&AsmInst::Li(Reg::A3, 3)));
    assert!(asm.text.contains(&AsmInst::Sw(Reg::T8, Address::Offset(16, Reg::Sp))));
    assert!(!asm.text.contains(&AsmInst::Sw(Reg::T8, Address::Offset(0, Reg::Sp))));
}

#[test]
fn test_register_arguments_through_recursion_and_nesting() {
    let fact = fact_fn();
    let main = main_fn(vec![], vec![print_value(call(&fact, vec![int(5)]))]);
    let program = Program {
        globals: vec![],
        functions: vec![fact, main],
    };
    let (_, output) = compile_asm(&program, &GeneratorOptions::default(), &reg_args());
    assert_eq!(output, "120\n");

    let add = add_fn();
    let main = main_fn(
        vec![],
        vec![print_value(call(
            &add,
            vec![call(&add, vec![int(10), int(3)]), call(&add, vec![int(1), int(1)])],
        ))],
    );
    let program = Program {
        globals: vec![],
        functions: vec![add, main],
    };
    let (_, output) = compile_asm(&program, &GeneratorOptions::default(), &reg_args());
    assert_eq!(output, "15\n");
}

#[test]
fn test_nested_calls_as_arguments() {
    let add = add_fn();
    let a = local("a", 1, Type::Int);
    let b = local("b", 2, Type::Int);
    let sub = function(
        "sub",
        Type::Int,
        vec![a.clone(), b.clone()],
        body(vec![], vec![TypedStmt::Return(Some(binary(BinaryOp::Sub, var(&a), var(&b))))]),
    );
    let main = main_fn(
        vec![],
        vec![print_value(call(
            &sub,
            vec![call(&sub, vec![int(10), int(3)]), call(&add, vec![int(1), int(1)])],
        ))],
    );
    let program = Program {
        globals: vec![],
        functions: vec![add, sub, main],
    };
    assert_eq!(run(&program), "5\n");
}

#[test]
fn test_recursive_factorial() {
    let fact = fact_fn();
    let main = main_fn(vec![], vec![print_value(call(&fact, vec![int(5)]))]);
    let program = Program {
        globals: vec![],
        functions: vec![fact, main],
    };
    assert_eq!(run(&program), "120\n");

    let generator = GeneratorOptions {
        fold_constants: false,
        leaf_registers: false,
    };
    let backend = BackendOptions {
        inline_epilogue: true,
        annotate: false,
        ..BackendOptions::default()
    };
    let (_, output, _) = compile(&program, &generator, &backend);
    assert_eq!(output, "120\n");
}

#[test]
fn test_for_and_do_while_over_local_array() {
    let arr = local("arr", 1, Type::array_of(Type::Int, 5));
    let i = local("i", 2, Type::Int);
    let s = local("s", 3, Type::Int);
    let main = main_fn(
        decls(&[&arr, &i, &s]),
        vec![
            TypedStmt::For {
                init: ForInit {
                    target: i.clone(),
                    value: int(0),
                },
                condition: compare(CompareOp::Lt, var(&i), int(5)),
                step: ForStep {
                    target: i.clone(),
                    source: i.clone(),
                    amount: 1,
                },
                body: Box::new(expr_stmt(assign(
                    index(&arr, var(&i)),
                    binary(BinaryOp::Mul, var(&i), var(&i)),
                ))),
            },
            expr_stmt(assign(var(&s), int(0))),
            expr_stmt(assign(var(&i), int(0))),
            TypedStmt::DoWhile {
                body: Box::new(TypedStmt::Compound(vec![
                    expr_stmt(assign(var(&s), binary(BinaryOp::Add, var(&s), index(&arr, var(&i))))),
                    expr_stmt(assign(var(&i), binary(BinaryOp::Add, var(&i), int(1)))),
                ])),
                condition: compare(CompareOp::Lt, var(&i), int(5)),
            },
            print_value(var(&s)),
        ],
    );
    let program = Program {
        globals: vec![],
        functions: vec![main],
    };
    assert_eq!(run(&program), "30\n");
}

#[test]
fn test_scan_and_char_output() {
    let c = local("c", 1, Type::Char);
    let x = local("x", 2, Type::Int);
    let main = main_fn(
        decls(&[&c, &x]),
        vec![
            TypedStmt::Scan(vec![c.clone(), x.clone()]),
            print_value(var(&c)),
            TypedStmt::Print {
                text: Some("x=".to_string()),
                value: Some(binary(BinaryOp::Add, var(&x), int(1))),
            },
        ],
    );
    let program = Program {
        globals: vec![],
        functions: vec![main],
    };
    assert_eq!(run_with_input(&program, "z5\n"), "z\nx=6\n");
}

#[test]
fn test_if_else_against_global_constant() {
    let limit = constant(global("LIMIT", 10, Type::Int));
    let v = local("v", 1, Type::Int);
    let branch = |value: i32| {
        main_fn(
            decls(&[&v]),
            vec![
                expr_stmt(assign(var(&v), int(value))),
                TypedStmt::If {
                    condition: compare(CompareOp::Gt, var(&v), var(&limit)),
                    then_stmt: Box::new(text("big")),
                    else_stmt: Some(Box::new(text("small"))),
                },
            ],
        )
    };
    for (value, expected) in [(12, "big\n"), (10, "small\n")] {
        let program = Program {
            globals: vec![GlobalDecl {
                symbol: limit.clone(),
                const_value: Some(10),
            }],
            functions: vec![branch(value)],
        };
        assert_eq!(run(&program), expected);
    }
}

#[test]
fn test_char_array_and_truthy_condition() {
    let buf = global("buf", 20, Type::array_of(Type::Char, 2));
    let flag = local("flag", 1, Type::Int);
    let main = main_fn(
        decls(&[&flag]),
        vec![
            expr_stmt(assign(index(&buf, int(0)), chr(b'h'))),
            expr_stmt(assign(index(&buf, int(1)), chr(b'i'))),
            expr_stmt(assign(var(&flag), int(0))),
            TypedStmt::If {
                condition: Condition::Truthy(var(&flag)),
                then_stmt: Box::new(text("unreachable")),
                else_stmt: None,
            },
            print_value(index(&buf, int(0))),
            print_value(index(&buf, int(1))),
        ],
    );
    let program = Program {
        globals: vec![GlobalDecl {
            symbol: buf,
            const_value: None,
        }],
        functions: vec![main],
    };
    assert_eq!(run(&program), "h\ni\n");
}

#[test]
fn test_void_function_with_early_return() {
    let n = local("n", 1, Type::Int);
    let show = function(
        "show",
        Type::Void,
        vec![n.clone()],
        body(
            vec![],
            vec![
                TypedStmt::If {
                    condition: compare(CompareOp::Eq, var(&n), int(0)),
                    then_stmt: Box::new(TypedStmt::Return(None)),
                    else_stmt: None,
                },
                print_value(var(&n)),
            ],
        ),
    );
    let main = main_fn(
        vec![],
        vec![
            expr_stmt(call(&show, vec![int(0)])),
            expr_stmt(call(&show, vec![int(8)])),
            TypedStmt::Return(None),
            text("after return"),
        ],
    );
    let program = Program {
        globals: vec![],
        functions: vec![show, main],
    };
    assert_eq!(run(&program), "8\n");
}
