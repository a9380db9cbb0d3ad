use duckdb_extension_framework::UnaryStringFunction;

pub const QUACK_PREFIX: &str = "Quack ";
pub const QUACK_SUFFIX: &str = " 🐥";

/// Length in bytes of the quacked form of a `name_len`-byte input.
pub fn quacked_len(name_len: usize) -> usize {
    QUACK_PREFIX.len() + name_len + QUACK_SUFFIX.len()
}

/// Writes prefix, `name` and suffix into `dst`, which must be exactly
/// `quacked_len(name.len())` bytes. No terminator is added.
pub fn write_quacked(dst: &mut [u8], name: &[u8]) {
    let (prefix, rest) = dst.split_at_mut(QUACK_PREFIX.len());
    let (middle, suffix) = rest.split_at_mut(name.len());
    prefix.copy_from_slice(QUACK_PREFIX.as_bytes());
    middle.copy_from_slice(name);
    suffix.copy_from_slice(QUACK_SUFFIX.as_bytes());
}

/// `quack(name VARCHAR) -> VARCHAR`: `"Quack " || name || " 🐥"`, NULL in, NULL out.
///
/// Input bytes are copied verbatim; nothing is validated or re-encoded.
pub struct QuackFunction;

impl UnaryStringFunction for QuackFunction {
    const NAME: &'static str = "quack";

    fn result_len(name: &[u8]) -> usize {
        quacked_len(name.len())
    }

    fn operation(name: &[u8], result: &mut [u8]) {
        write_quacked(result, name);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use duckdb_extension_framework::testing::{MockAllocator, MockOutput, MockStrings, OutputCell};
    use duckdb_extension_framework::{Error, StringInput, VScalar};
    use quickcheck::quickcheck;

    fn quack(rows: Vec<Option<&str>>) -> Vec<OutputCell> {
        let input = MockStrings::new(rows);
        let mut output = MockOutput::new(input.len());
        let allocator = MockAllocator::new();
        QuackFunction::invoke(&allocator, &input, &mut output).unwrap();
        assert_eq!(allocator.outstanding(), 0);
        output.cells().to_vec()
    }

    fn value(s: &str) -> OutputCell {
        OutputCell::Value(s.as_bytes().to_vec())
    }

    #[test]
    fn test_world() {
        let out = quack(vec![Some("world")]);
        assert_eq!(out, vec![value("Quack world 🐥")]);
        let OutputCell::Value(bytes) = &out[0] else { unreachable!() };
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[11..], &[0x20, 0xF0, 0x9F, 0x90, 0xA5]);
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let out = quack(vec![Some("")]);
        assert_eq!(out, vec![value("Quack  🐥")]);
        let OutputCell::Value(bytes) = &out[0] else { unreachable!() };
        assert_eq!(bytes.len(), 11);
    }

    #[test]
    fn test_null_stays_null() {
        assert_eq!(quack(vec![None]), vec![OutputCell::Null]);
    }

    #[test]
    fn test_mixed_batch() {
        assert_eq!(
            quack(vec![Some("a"), None, Some("bb")]),
            vec![value("Quack a 🐥"), OutputCell::Null, value("Quack bb 🐥")]
        );
    }

    #[test]
    fn test_batch_sizes() {
        assert!(quack(vec![]).is_empty());
        assert_eq!(quack(vec![Some("x")]).len(), 1);

        let rows: Vec<Option<&str>> = (0..2048).map(|i| if i % 3 == 0 { None } else { Some("duck") }).collect();
        let out = quack(rows);
        assert_eq!(out.len(), 2048);
        assert!(out.iter().all(|cell| *cell != OutputCell::Unwritten));
        assert_eq!(out[0], OutputCell::Null);
        assert_eq!(out[1], value("Quack duck 🐥"));
    }

    #[test]
    fn test_non_utf8_bytes_pass_through() {
        let input = MockStrings::new(vec![Some(vec![0xFFu8, 0x00, 0xFE])]);
        let mut output = MockOutput::new(1);
        QuackFunction::invoke(&MockAllocator::new(), &input, &mut output).unwrap();

        let mut expected = b"Quack ".to_vec();
        expected.extend_from_slice(&[0xFF, 0x00, 0xFE]);
        expected.extend_from_slice(QUACK_SUFFIX.as_bytes());
        assert_eq!(output.cell(0), &OutputCell::Value(expected));
    }

    #[test]
    fn test_allocation_failure_aborts_remaining_rows() {
        let input = MockStrings::new(vec![Some("a"), None, Some("bb"), Some("ccc")]);
        let mut output = MockOutput::new(input.len());
        // rows 0 and 2 allocate; the second request fails
        let allocator = MockAllocator::failing_at(1);

        let err = QuackFunction::invoke(&allocator, &input, &mut output).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure { size } if size == quacked_len(2)));
        assert_eq!(
            output.cells(),
            &[value("Quack a 🐥"), OutputCell::Null, OutputCell::Unwritten, OutputCell::Unwritten]
        );
        assert_eq!(allocator.allocations(), 1);
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_one_buffer_per_non_null_row() {
        let input = MockStrings::new(vec![Some("a"), None, Some("b")]);
        let mut output = MockOutput::new(3);
        let allocator = MockAllocator::new();
        QuackFunction::invoke(&allocator, &input, &mut output).unwrap();
        assert_eq!(allocator.allocations(), 2);
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_operation_fills_exact_buffer() {
        assert_eq!(QuackFunction::NAME, "quack");
        let mut result = vec![0u8; QuackFunction::result_len(b"world")];
        QuackFunction::operation(b"world", &mut result);
        assert_eq!(result, "Quack world 🐥".as_bytes());
    }

    #[test]
    fn test_quacked_len() {
        assert_eq!(QUACK_PREFIX.len(), 6);
        assert_eq!(QUACK_SUFFIX.len(), 5);
        assert_eq!(quacked_len(5), 16);
    }

    quickcheck! {
        fn prop_quack_is_concatenation(rows: Vec<Option<Vec<u8>>>) -> bool {
            let input = MockStrings::new(rows.clone());
            let mut output = MockOutput::new(input.len());
            let allocator = MockAllocator::new();
            QuackFunction::invoke(&allocator, &input, &mut output).unwrap();

            allocator.outstanding() == 0
                && output.len() == rows.len()
                && rows.iter().zip(output.cells()).all(|(row, cell)| match row {
                    None => *cell == OutputCell::Null,
                    Some(name) => {
                        let mut expected = QUACK_PREFIX.as_bytes().to_vec();
                        expected.extend_from_slice(name);
                        expected.extend_from_slice(QUACK_SUFFIX.as_bytes());
                        *cell == OutputCell::Value(expected)
                    }
                })
        }
    }
}
