//! End-to-end pipeline tests: parse, encode, decode, execute.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use watc::parser::DecodeError;
    use watc::runtime::RuntimeError;
    use watc::{compile, parser, run, Error};

    const ADD_WAT: &str = "(module\n(func (export \"add\") (param i32 i32) (result i32)\nlocal.get 0\nlocal.get 1\ni32.add)";

    #[test]
    fn end_to_end_add() {
        let bytes = compile(ADD_WAT).unwrap();
        let execution = run(&bytes, &[20, 10]).unwrap();

        assert_eq!(execution.functions.len(), 1);
        let outcome = &execution.functions[0];
        assert_eq!(outcome.stack, vec![30]);
        assert_eq!(outcome.trace.len(), 1);
        assert_eq!(outcome.trace[0].to_string(), "20 + 10 = 30");
    }

    #[rstest]
    #[case("i32.sub", 10, "20 - 10 = 10")]
    #[case("i32.mul", 200, "20 * 10 = 200")]
    #[case("i32.div_s", 2, "20 / 10 = 2")]
    fn end_to_end_arithmetic(#[case] mnemonic: &str, #[case] expected: i32, #[case] trace: &str) {
        let source = format!(
            "(module\n(func (export \"f\") (param i32 i32) (result i32)\nlocal.get 0\nlocal.get 1\n{mnemonic})"
        );
        let bytes = compile(&source).unwrap();
        let execution = run(&bytes, &[20, 10]).unwrap();

        assert_eq!(execution.functions[0].stack, vec![expected]);
        assert_eq!(execution.functions[0].trace[0].to_string(), trace);
    }

    #[test]
    fn end_to_end_division_by_zero() {
        let source = "(module\n(func (export \"f\") (param i32 i32) (result i32)\nlocal.get 0\nlocal.get 1\ni32.div_s)";
        let bytes = compile(source).unwrap();
        assert_eq!(
            run(&bytes, &[7, 0]),
            Err(Error::Runtime(RuntimeError::DivisionByZero))
        );
    }

    #[test]
    fn end_to_end_stack_underflow() {
        // a lone add has nothing to pop
        let source = "(module\n(func (export \"f\") (result i32)\ni32.add)";
        let bytes = compile(source).unwrap();
        assert_eq!(
            run(&bytes, &[]),
            Err(Error::Runtime(RuntimeError::StackUnderflow))
        );
    }

    // every single-byte mutation of the 8-byte preamble must be rejected
    // with the error kind matching the half it lands in
    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    #[case(6)]
    #[case(7)]
    fn header_mutation_rejected(#[case] index: usize) {
        let mut bytes = compile(ADD_WAT).unwrap();
        bytes[index] ^= 0xFF;

        let expected = if index < 4 {
            DecodeError::InvalidMagic
        } else {
            DecodeError::InvalidVersion
        };
        assert_eq!(parser::validate_header(&bytes), Err(expected.clone()));
        assert_eq!(run(&bytes, &[]), Err(Error::Decode(expected)));
    }

    #[test]
    fn header_too_short() {
        let bytes = compile(ADD_WAT).unwrap();
        for len in 0..8 {
            assert_eq!(
                parser::validate_header(&bytes[..len]),
                Err(DecodeError::TooShort)
            );
        }
    }

    #[test]
    fn running_arbitrary_bytes_is_an_error_not_a_panic() {
        assert_eq!(run(b"", &[]), Err(Error::Decode(DecodeError::TooShort)));
        assert_eq!(
            run(b"not a wasm module", &[]),
            Err(Error::Decode(DecodeError::InvalidMagic))
        );
    }

    #[test]
    fn oversized_section_size_varint_is_an_error_not_a_panic() {
        // valid preamble, then a section whose size varint never fits a u32
        let mut bytes = compile("(module").unwrap();
        bytes.extend_from_slice(&[0x01, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(
            run(&bytes, &[]),
            Err(Error::Decode(DecodeError::VarintOverflow))
        );
    }

    #[test]
    fn end_to_end_wide_local_index() {
        // local.get with an index needing a multi-byte immediate must round-trip
        let source = "(module\n(func (export \"f\") (param i32 i32) (result i32)\nlocal.get 256\nlocal.get 257\ni32.add)";
        let bytes = compile(source).unwrap();
        let params: Vec<i32> = (0..300).collect();
        let execution = run(&bytes, &params).unwrap();
        assert_eq!(execution.functions[0].stack, vec![513]);
    }

    #[test]
    fn module_without_code_section_reports_not_found() {
        // a module with no function has no code section to execute
        let bytes = compile("(module").unwrap();
        assert_eq!(
            run(&bytes, &[]),
            Err(Error::Decode(DecodeError::CodeSectionNotFound))
        );
    }

    #[test]
    fn truncated_module_reports_truncated_section() {
        let bytes = compile(ADD_WAT).unwrap();
        // drop the last three bytes of the code section
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            run(truncated, &[]),
            Err(Error::Decode(DecodeError::TruncatedSection { .. }))
        ));
    }

    #[test]
    fn compile_reports_parse_errors() {
        assert!(matches!(
            compile("(func (export \"f\")"),
            Err(Error::Parse(_))
        ));
    }
}
