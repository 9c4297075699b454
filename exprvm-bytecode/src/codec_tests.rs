use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sample() -> InstructionSet {
    InstructionSet::from(vec![
        Instruction::Nop,
        Instruction::PushBoolean(true),
        Instruction::PushByte(-3),
        Instruction::PushChar('ß'),
        Instruction::PushDouble(10.5),
        Instruction::PushFloat(1.25),
        Instruction::PushInt(-42),
        Instruction::PushLong(10_000_000_000),
        Instruction::PushShort(512),
        Instruction::PushString("héllo".to_string()),
        Instruction::PushNull,
        Instruction::LoadVariable { name: "name".to_string() },
        Instruction::InvokeMember {
            handle: MemberHandle::new("String", "formatted", "(*[LObject;)LString;"),
            argc: 2,
            spread: true,
        },
        Instruction::GetField { owner: "Point".to_string(), name: "x".to_string() },
    ])
}

#[test]
fn test_round_trip_preserves_order_and_operands() {
    let program = sample();
    let bytes = program.to_bytes().unwrap();
    let decoded = InstructionSet::from_bytes(&bytes, &OpcodeRegistry::standard()).unwrap();
    assert_eq!(decoded, program);
}

#[test]
fn test_wire_layout() {
    let program = InstructionSet::from(vec![
        Instruction::PushInt(1),
        Instruction::LoadVariable { name: "ab".to_string() },
    ]);
    assert_eq!(
        program.to_bytes().unwrap(),
        vec![0x06, 0, 0, 0, 1, 0x0B, 0, 0, 0, 2, b'a', b'b']
    );
}

#[test]
fn test_invoke_layout() {
    let program = InstructionSet::from(vec![Instruction::InvokeMember {
        handle: MemberHandle::new("A", "f", "()I"),
        argc: 3,
        spread: false,
    }]);
    let mut expected = vec![0x0C];
    for part in ["A", "f", "()I"] {
        expected.extend_from_slice(&(part.len() as u32).to_be_bytes());
        expected.extend_from_slice(part.as_bytes());
    }
    expected.extend_from_slice(&[0, 3, 0]);
    assert_eq!(program.to_bytes().unwrap(), expected);
}

#[test]
fn test_empty_input_is_empty_program() {
    let decoded = InstructionSet::from_bytes(&[], &OpcodeRegistry::standard()).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_unknown_opcode() {
    let err = InstructionSet::from_bytes(&[0x0A, 0x42], &OpcodeRegistry::standard()).unwrap_err();
    assert!(matches!(err, CodecError::UnknownOpcode { opcode: 0x42, index: 1 }));

    let err = InstructionSet::from_bytes(&[0xFF], &OpcodeRegistry::standard()).unwrap_err();
    assert!(matches!(err, CodecError::UnknownOpcode { opcode: 0xFF, index: 0 }));
}

#[test]
fn test_truncated_payloads() {
    let registry = OpcodeRegistry::standard();
    for bytes in [
        vec![0x06, 0, 0],
        vec![0x09, 0, 0, 0, 5, b'a'],
        vec![0x0B],
        vec![0x07, 1, 2, 3, 4, 5, 6, 7],
    ] {
        let err = InstructionSet::from_bytes(&bytes, &registry).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { index: 0, .. }), "{:?}", bytes);
    }
}

#[test]
fn test_invalid_payloads() {
    let registry = OpcodeRegistry::standard();
    let bad_utf8 = [0x09, 0, 0, 0, 2, 0xC3, 0x28];
    let bad_char = [0x03, 0x00, 0x11, 0x00, 0x00];
    let bad_bool = [0x01, 7];
    for bytes in [&bad_utf8[..], &bad_char[..], &bad_bool[..]] {
        let err = InstructionSet::from_bytes(bytes, &registry).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPayload { .. }), "{:?}", bytes);
    }
}

#[test]
fn test_restricted_registry_rejects_missing_opcodes() {
    let registry = OpcodeRegistry::builder()
        .with_opcode(Opcode::PushInt)
        .unwrap()
        .build();
    let bytes = sample().to_bytes().unwrap();
    let err = InstructionSet::from_bytes(&bytes, &registry).unwrap_err();
    assert!(matches!(err, CodecError::UnknownOpcode { opcode: 0x00, .. }));
}

#[test]
fn test_restricted_registry_refuses_to_write() {
    let registry = OpcodeRegistry::builder()
        .with_opcode(Opcode::PushInt)
        .unwrap()
        .build();
    let allowed = InstructionSet::from(vec![Instruction::PushInt(7)]);
    assert_eq!(allowed.to_bytes_with(&registry).unwrap(), allowed.to_bytes().unwrap());

    let program = InstructionSet::from(vec![Instruction::PushInt(1), Instruction::PushString("x".to_string())]);
    let mut out = Vec::new();
    let err = write_program(&program, &mut out, &registry).unwrap_err();
    assert!(matches!(err, CodecError::UnboundOpcode { opcode: 0x09, index: 1 }));
    assert!(out.is_empty());
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    let name = "[A-Za-z_][A-Za-z0-9_]{0,8}";
    prop_oneof![
        Just(Instruction::Nop),
        Just(Instruction::PushNull),
        any::<bool>().prop_map(Instruction::PushBoolean),
        any::<i8>().prop_map(Instruction::PushByte),
        any::<char>().prop_map(Instruction::PushChar),
        any::<i32>().prop_map(Instruction::PushInt),
        any::<i64>().prop_map(Instruction::PushLong),
        any::<i16>().prop_map(Instruction::PushShort),
        (-1.0e9f64..1.0e9).prop_map(Instruction::PushDouble),
        (-1.0e6f32..1.0e6).prop_map(Instruction::PushFloat),
        "\\PC{0,16}".prop_map(Instruction::PushString),
        name.prop_map(|name| Instruction::LoadVariable { name }),
        (name, name).prop_map(|(owner, name)| Instruction::GetField { owner, name }),
        (name, name, any::<u16>(), any::<bool>()).prop_map(|(owner, name, argc, spread)| {
            Instruction::InvokeMember {
                handle: MemberHandle::new(owner, name, "(ILString;)V"),
                argc,
                spread,
            }
        }),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip(instructions in proptest::collection::vec(arb_instruction(), 0..24)) {
        let program = InstructionSet::from(instructions);
        let bytes = program.to_bytes().unwrap();
        let decoded = InstructionSet::from_bytes(&bytes, &OpcodeRegistry::standard()).unwrap();
        prop_assert_eq!(decoded, program);
    }
}
