use super::*;
use exprvm_bytecode::Instruction;
use exprvm_core::{InvokeError, MemberHandle, ObjectValue, TypeRef};
use exprvm_stdlib::{init_stdlib, TypeDef};
use pretty_assertions::assert_eq;

fn vm() -> VM {
    let registry = init_stdlib().with_type(
        TypeDef::new("Point")
            .field("x", TypeRef::int())
            .field("y", TypeRef::int())
            .private_field("label", TypeRef::string()),
    ).unwrap();
    VM::new(Arc::new(registry))
}

fn point() -> Value {
    ObjectValue::new("Point")
        .with_field("x", 3)
        .with_field("y", 4)
        .with_field("label", "origin")
        .into()
}

fn run(instructions: Vec<Instruction>) -> VMResult<Value> {
    vm().execute(&InstructionSet::from(instructions), &RuntimeBindings::empty())
}

fn invoke(owner: &str, name: &str, descriptor: &str, argc: u16) -> Instruction {
    Instruction::InvokeMember {
        handle: MemberHandle::new(owner, name, descriptor),
        argc,
        spread: false,
    }
}

mod stack {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_literal() {
        assert_eq!(run(vec![Instruction::PushInt(1)]).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_literals() {
        let cases = vec![
            (Instruction::PushBoolean(true), Value::Boolean(true)),
            (Instruction::PushByte(-3), Value::Byte(-3)),
            (Instruction::PushChar('λ'), Value::Char('λ')),
            (Instruction::PushDouble(2.5), Value::Double(2.5)),
            (Instruction::PushFloat(1.5), Value::Float(1.5)),
            (Instruction::PushLong(1 << 40), Value::Long(1 << 40)),
            (Instruction::PushShort(7), Value::Short(7)),
            (Instruction::PushString("hi".to_string()), Value::from("hi")),
            (Instruction::PushNull, Value::Null),
        ];
        for (instruction, expected) in cases {
            assert_eq!(run(vec![instruction]).unwrap(), expected);
        }
    }

    #[test]
    fn test_nop_pushes_nothing() {
        assert_eq!(
            run(vec![Instruction::Nop, Instruction::PushInt(2), Instruction::Nop]).unwrap(),
            Value::Int(2)
        );
        assert!(matches!(
            run(vec![Instruction::Nop]),
            Err(VMError::StackUnderflow { stack_size: 0, .. })
        ));
    }

    #[test]
    fn test_empty_program() {
        let err = run(vec![]).unwrap_err();
        assert!(matches!(err, VMError::StackUnderflow { ref operation, .. } if operation == "result"));
    }

    #[test]
    fn test_leftover_values() {
        let err = run(vec![Instruction::PushInt(1), Instruction::PushInt(2)]).unwrap_err();
        assert!(matches!(err, VMError::MalformedProgram { .. }));
    }

    #[test]
    fn test_overflow() {
        let registry = Arc::new(init_stdlib());
        let vm = VM::with_config(
            registry,
            VMConfig {
                max_stack_depth: 2,
                trace: false,
            },
        );
        let program = InstructionSet::from(vec![Instruction::PushInt(1); 3]);
        let err = vm.execute(&program, &RuntimeBindings::empty()).unwrap_err();
        assert!(matches!(
            err,
            VMError::StackOverflow {
                current_depth: 3,
                max_depth: 2
            }
        ));
    }

    #[test]
    fn test_invoke_underflow() {
        let err = run(vec![
            Instruction::PushString("abc".to_string()),
            invoke("String", "substring", "(I)LString;", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, VMError::StackUnderflow { ref operation, .. } if operation == "invoke"));
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_variable() {
        let bindings = RuntimeBindings::builder().with_variable("name", "hello").build();
        let program = InstructionSet::from(vec![
            Instruction::LoadVariable { name: "name".to_string() },
            invoke("String", "length", "()I", 0),
        ]);
        assert_eq!(vm().execute(&program, &bindings).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_unbound_variable() {
        let err = run(vec![Instruction::LoadVariable { name: "missing".to_string() }]).unwrap_err();
        assert!(matches!(err, VMError::UnboundVariable { ref name } if name == "missing"));
    }
}

mod members {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_keep_source_order() {
        let result = run(vec![
            Instruction::PushString("hello".to_string()),
            Instruction::PushInt(1),
            Instruction::PushInt(3),
            invoke("String", "substring", "(II)LString;", 2),
        ])
        .unwrap();
        assert_eq!(result, Value::from("el"));
    }

    #[test]
    fn test_spread_packs_trailing_arguments() {
        let result = run(vec![
            Instruction::PushString("%s=%d".to_string()),
            Instruction::PushString("x".to_string()),
            Instruction::PushInt(7),
            Instruction::InvokeMember {
                handle: MemberHandle::new("String", "formatted", "(*[LObject;)LString;"),
                argc: 2,
                spread: true,
            },
        ])
        .unwrap();
        assert_eq!(result, Value::from("x=7"));
    }

    #[test]
    fn test_spread_on_fixed_method() {
        let err = run(vec![
            Instruction::PushString("abc".to_string()),
            Instruction::InvokeMember {
                handle: MemberHandle::new("String", "length", "()I"),
                argc: 0,
                spread: true,
            },
        ])
        .unwrap_err();
        assert!(matches!(err, VMError::MalformedProgram { .. }));
    }

    #[test]
    fn test_target_failure() {
        let err = run(vec![
            Instruction::PushString("abc".to_string()),
            Instruction::PushInt(9),
            invoke("String", "substring", "(I)LString;", 1),
        ])
        .unwrap_err();
        match err {
            VMError::Execution { member, source } => {
                assert_eq!(member, "String.substring(I)LString;");
                assert!(matches!(source, InvokeError::Target { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_null_receiver() {
        let err = run(vec![Instruction::PushNull, invoke("String", "length", "()I", 0)]).unwrap_err();
        assert!(matches!(
            err,
            VMError::Execution {
                source: InvokeError::NullReceiver { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_handle() {
        let err = run(vec![
            Instruction::PushString("abc".to_string()),
            invoke("String", "reverse", "()LString;", 0),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            VMError::Execution {
                source: InvokeError::NotFound { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_field_read() {
        let bindings = RuntimeBindings::builder().with_variable("p", point()).build();
        let program = InstructionSet::from(vec![
            Instruction::LoadVariable { name: "p".to_string() },
            Instruction::GetField {
                owner: "Point".to_string(),
                name: "y".to_string(),
            },
        ]);
        assert_eq!(vm().execute(&program, &bindings).unwrap(), Value::Int(4));
    }

    #[test]
    fn test_private_field_needs_flag() {
        let program = InstructionSet::from(vec![
            Instruction::LoadVariable { name: "p".to_string() },
            Instruction::GetField {
                owner: "Point".to_string(),
                name: "label".to_string(),
            },
        ]);

        let denied = RuntimeBindings::builder().with_variable("p", point()).build();
        let err = vm().execute(&program, &denied).unwrap_err();
        assert!(matches!(
            err,
            VMError::Execution {
                source: InvokeError::AccessDenied { .. },
                ..
            }
        ));

        let allowed = RuntimeBindings::builder()
            .with_variable("p", point())
            .with_allow_private(true)
            .build();
        assert_eq!(vm().execute(&program, &allowed).unwrap(), Value::from("origin"));
    }
}

#[test]
fn test_program_is_reusable() {
    let vm = vm();
    let program = InstructionSet::from(vec![
        Instruction::PushString("ab".to_string()),
        Instruction::PushString("cd".to_string()),
        invoke("String", "concat", "(LString;)LString;", 1),
    ]);
    let first = vm.execute(&program, &RuntimeBindings::empty()).unwrap();
    let second = vm.execute(&program, &RuntimeBindings::empty()).unwrap();
    assert_eq!(first, Value::from("abcd"));
    assert_eq!(first, second);
}
