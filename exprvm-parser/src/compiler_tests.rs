use super::*;
use crate::error::ErrorKind;
use exprvm_core::{MethodSignature, ResolveError, Value};
use exprvm_stdlib::{init_stdlib, TypeDef, TypeRegistry};
use pretty_assertions::assert_eq;

fn registry() -> TypeRegistry {
    init_stdlib()
        .with_type(
            TypeDef::new("Person")
                .getter("name", TypeRef::string())
                .getter("address", TypeRef::reference("Address"))
                .private_field("nickname", TypeRef::string()),
        ).unwrap()
        .with_type(
            TypeDef::new("Address")
                .field("city", TypeRef::string())
                .field("size", TypeRef::int())
                .method("getSize", vec![], TypeRef::long(), |_, _| Ok(Value::Long(0))),
        ).unwrap()
        .with_type(
            TypeDef::new("Calc")
                .method("add", vec![TypeRef::object(), TypeRef::object()], TypeRef::string(), |_, _| {
                    Ok(Value::from("objects"))
                })
                .method("add", vec![TypeRef::int(), TypeRef::int()], TypeRef::int(), |_, _| {
                    Ok(Value::Int(0))
                })
                .method_with(
                    MethodSignature::new("Calc", "secret", vec![], TypeRef::int()).private(),
                    |_, _| Ok(Value::Int(42)),
                ),
        ).unwrap()
}

fn bindings() -> CompileBindings {
    CompileBindings::builder()
        .with_variable("name", TypeRef::string())
        .with_variable("person", TypeRef::reference("Person"))
        .with_variable("calc", TypeRef::reference("Calc"))
        .with_variable("obj", TypeRef::object())
        .build()
}

fn compile(source: &str) -> CompileResult<Compiled> {
    let registry = registry();
    Compiler::new(&registry).compile_typed(source, &bindings())
}

fn invoke(owner: &str, name: &str, descriptor: &str, argc: u16) -> Instruction {
    Instruction::InvokeMember {
        handle: MemberHandle::new(owner, name, descriptor),
        argc,
        spread: false,
    }
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_int() {
        let compiled = compile("1").unwrap();
        assert_eq!(compiled.program.instructions(), &[Instruction::PushInt(1)]);
        assert_eq!(compiled.hints, vec![TypeHint::new(0, TypeRef::int())]);
        assert_eq!(compiled.result_type, TypeRef::int());
    }

    #[test]
    fn test_numeric_precedence() {
        let cases = [
            ("10", Instruction::PushInt(10), TypeRef::int()),
            ("10L", Instruction::PushLong(10), TypeRef::long()),
            ("10000000000", Instruction::PushLong(10_000_000_000), TypeRef::long()),
            ("10F", Instruction::PushFloat(10.0), TypeRef::float()),
            ("10.5", Instruction::PushDouble(10.5), TypeRef::double()),
            ("10.5d", Instruction::PushDouble(10.5), TypeRef::double()),
        ];
        for (source, instruction, ty) in cases {
            let compiled = compile(source).unwrap();
            assert_eq!(compiled.program.instructions(), &[instruction], "{}", source);
            assert_eq!(compiled.result_type, ty, "{}", source);
        }
    }

    #[test]
    fn test_strings() {
        let compiled = compile(r#"'it\'s'"#).unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[Instruction::PushString("it's".to_string())]
        );
        assert_eq!(compiled.result_type, TypeRef::string());
    }

    #[test]
    fn test_empty_source() {
        let compiled = compile("   ").unwrap();
        assert!(compiled.program.is_empty());
        assert_eq!(compiled.result_type, TypeRef::Void);
    }

    #[test]
    fn test_words_are_not_numbers() {
        let err = compile("NaN").unwrap_err();
        assert_eq!(
            err.reference(),
            Some(&UnresolvedReference::Variable { name: "NaN".to_string() })
        );
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variable_method_call() {
        let compiled = compile("name.length()").unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[
                Instruction::LoadVariable { name: "name".to_string() },
                invoke("String", "length", "()I", 0),
            ]
        );
        assert_eq!(compiled.result_type, TypeRef::int());
    }

    #[test]
    fn test_nested_arguments() {
        let compiled = compile(r#""a100".substring("a".length)"#).unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[
                Instruction::PushString("a100".to_string()),
                Instruction::PushString("a".to_string()),
                invoke("String", "length", "()I", 0),
                invoke("String", "substring", "(I)LString;", 1),
            ]
        );
        assert_eq!(compiled.result_type, TypeRef::string());
    }

    #[test]
    fn test_argument_order() {
        let compiled = compile("name.substring(1, 3)").unwrap();
        assert_eq!(
            &compiled.program.instructions()[1..],
            &[
                Instruction::PushInt(1),
                Instruction::PushInt(3),
                invoke("String", "substring", "(II)LString;", 2),
            ]
        );
    }

    #[test]
    fn test_overload_prefers_primitive_parameters() {
        let compiled = compile("calc.add(1, 2)").unwrap();
        assert_eq!(compiled.program.last(), Some(&invoke("Calc", "add", "(II)I", 2)));

        let compiled = compile(r#"calc.add("a", 2)"#).unwrap();
        assert_eq!(
            compiled.program.last(),
            Some(&invoke("Calc", "add", "(LObject;LObject;)LString;", 2))
        );
    }

    #[test]
    fn test_variadic_call_spreads() {
        let compiled = compile(r#""%s-%d".formatted(name, 2)"#).unwrap();
        assert_eq!(
            compiled.program.last(),
            Some(&Instruction::InvokeMember {
                handle: MemberHandle::new("String", "formatted", "(*[LObject;)LString;"),
                argc: 2,
                spread: true,
            })
        );
    }

    #[test]
    fn test_primitive_receiver_uses_boxed_type() {
        let compiled = compile("10.hashCode()").unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[Instruction::PushInt(10), invoke("Object", "hashCode", "()I", 0)]
        );
    }

    #[test]
    fn test_whitespace_between_parts() {
        let compiled = compile("  name . substring ( 1 , 2 ) . length ( )  ").unwrap();
        assert_eq!(compiled.program.len(), 5);
        assert_eq!(compiled.result_type, TypeRef::int());
    }

    #[test]
    fn test_unknown_method() {
        let err = compile("name.frobnicate(1)").unwrap_err();
        assert_eq!(err.context(), SourceContext::new(5, 13));
        match err.reference() {
            Some(UnresolvedReference::Member(ResolveError::NoSuchMember { owner, name, args })) => {
                assert_eq!(owner, "String");
                assert_eq!(name, "frobnicate");
                assert_eq!(args, &vec![TypeRef::int()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_private_method_needs_flag() {
        let registry = registry();
        let compiler = Compiler::new(&registry);
        assert!(compiler.compile("calc.secret()", &bindings()).is_err());

        let bindings = CompileBindings::builder()
            .with_variable("calc", TypeRef::reference("Calc"))
            .with_allow_private(true)
            .build();
        let program = compiler.compile("calc.secret()", &bindings).unwrap();
        assert_eq!(program.last(), Some(&invoke("Calc", "secret", "()I", 0)));
    }
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chained_getters_and_field() {
        let compiled = compile("person.address.city").unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[
                Instruction::LoadVariable { name: "person".to_string() },
                invoke("Person", "getAddress", "()LAddress;", 0),
                Instruction::GetField { owner: "Address".to_string(), name: "city".to_string() },
            ]
        );
        assert_eq!(
            compiled.hints.iter().map(|h| h.ty.clone()).collect::<Vec<_>>(),
            vec![TypeRef::reference("Person"), TypeRef::reference("Address"), TypeRef::string()]
        );
    }

    #[test]
    fn test_getter_wins_over_field() {
        let compiled = compile("person.address.size").unwrap();
        assert_eq!(compiled.program.last(), Some(&invoke("Address", "getSize", "()J", 0)));
        assert_eq!(compiled.result_type, TypeRef::long());
    }

    #[test]
    fn test_inherited_getter_shadows_own_field() {
        let registry = init_stdlib()
            .with_type(TypeDef::new("Base").getter("x", TypeRef::int()))
            .unwrap()
            .with_type(TypeDef::new("Sub").extends("Base").field("x", TypeRef::long()))
            .unwrap();
        let bindings = CompileBindings::builder()
            .with_variable("sub", TypeRef::reference("Sub"))
            .build();
        let compiled = Compiler::new(&registry).compile_typed("sub.x", &bindings).unwrap();
        assert_eq!(compiled.program.last(), Some(&invoke("Base", "getX", "()I", 0)));
        assert_eq!(compiled.result_type, TypeRef::int());
    }

    #[test]
    fn test_zero_argument_method_as_property() {
        let compiled = compile("name.length").unwrap();
        assert_eq!(compiled.program.last(), Some(&invoke("String", "length", "()I", 0)));
    }

    #[test]
    fn test_private_field_hidden() {
        let err = compile("person.nickname").unwrap_err();
        assert_eq!(
            err.reference(),
            Some(&UnresolvedReference::Field {
                owner: "Person".to_string(),
                name: "nickname".to_string()
            })
        );
        assert_eq!(err.context(), SourceContext::new(7, 8));
    }
}

mod casts {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cast_retypes_without_emitting() {
        let compiled = compile(r#"obj.?as("String").length()"#).unwrap();
        assert_eq!(
            compiled.program.instructions(),
            &[
                Instruction::LoadVariable { name: "obj".to_string() },
                invoke("String", "length", "()I", 0),
            ]
        );
        assert_eq!(compiled.hint(0), Some(&TypeRef::string()));
    }

    #[test]
    fn test_cast_argument_rules() {
        for source in [r#"obj.?as(name)"#, r#"obj.?as()"#, r#"obj.?as("String", "Object")"#] {
            let err = compile(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCast, "{}", source);
        }
    }

    #[test]
    fn test_cast_to_unknown_type() {
        let err = compile(r#"obj.?as("Robot")"#).unwrap_err();
        assert_eq!(
            err.reference(),
            Some(&UnresolvedReference::Type { name: "Robot".to_string() })
        );
    }
}

mod syntax {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_braces() {
        assert_eq!(compile("{ 1 }").unwrap().program.instructions(), &[Instruction::PushInt(1)]);
        assert_eq!(compile("{1}").unwrap().result_type, TypeRef::int());
        assert_eq!(compile("{ 1").unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_braces_can_be_disabled() {
        let registry = registry();
        let options = CompilerOptions {
            allow_braces: false,
            ..CompilerOptions::default()
        };
        let err = Compiler::with_options(&registry, options)
            .compile("{ 1 }", &bindings())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_call_without_receiver() {
        let err = compile("length()").unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingReceiver {
                name: "length".to_string(),
                context: SourceContext::new(0, 6),
            }
        );
    }

    #[test]
    fn test_undeclared_variable() {
        let err = compile("nmae.length()").unwrap_err();
        assert_eq!(
            err.render("nmae.length()"),
            "Undeclared variable nmae\nnmae.length()\n^~~~"
        );
    }

    #[test]
    fn test_malformed_argument_list() {
        let err = compile("name.substring(1 2)").unwrap_err();
        match err {
            CompileError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "',' or ')'");
                assert_eq!(found, "2");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(compile("name.substring(1").unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(compile("1 2").unwrap_err().kind(), ErrorKind::UnexpectedToken);
        assert_eq!(compile("name.").unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_fraction_then_member() {
        let compiled = compile("1.5.toString()").unwrap();
        assert_eq!(compiled.program.instructions()[0], Instruction::PushDouble(1.5));
        assert_eq!(compiled.result_type, TypeRef::string());

        let compiled = compile("-2147483648").unwrap();
        assert_eq!(compiled.program.instructions(), &[Instruction::PushInt(i32::MIN)]);
    }

    #[test]
    fn test_stray_character() {
        let err = compile("name:length").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: ":".to_string(),
                context: SourceContext::new(4, 1),
            }
        );
    }

    #[test]
    fn test_literal_error_offsets() {
        assert_eq!(
            compile("name.concat('ab\\q')").unwrap_err(),
            CompileError::InvalidEscape {
                escape: 'q',
                context: SourceContext::new(15, 2),
            }
        );
    }

    #[test]
    fn test_literal_errors_propagate() {
        assert_eq!(compile(r#""abc"#).unwrap_err().kind(), ErrorKind::UnterminatedLiteral);
        assert_eq!(compile(r#""a\x""#).unwrap_err().kind(), ErrorKind::InvalidEscape);
    }

    #[test]
    fn test_max_depth() {
        let registry = registry();
        let source = "name.concat(name.concat(name.concat(name)))";
        let shallow = CompilerOptions {
            max_depth: 2,
            ..CompilerOptions::default()
        };
        let err = Compiler::with_options(&registry, shallow)
            .compile(source, &bindings())
            .unwrap_err();
        assert!(matches!(err, CompileError::MaxDepthExceeded { depth: 3, max_depth: 2, .. }));
        assert!(Compiler::new(&registry).compile(source, &bindings()).is_ok());
    }

    #[test]
    fn test_one_hint_per_value() {
        let compiled = compile(r#"person.address.city.concat(name.substring(1)).length()"#).unwrap();
        let producing = compiled.program.iter().filter(|i| i.produces_value()).count();
        assert_eq!(compiled.hints.len(), producing);
        for (i, hint) in compiled.hints.iter().enumerate() {
            assert_eq!(hint.index, i);
        }
    }
}
