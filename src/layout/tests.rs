// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod layout_tests {
    use crate::error::{LayoutError, RecordError};
    use crate::layout::RecordLayout;
    use crate::types::*;

    /// head/middle/tail are 4-byte records, first is array<u32>, second is
    /// array<u8>.
    fn scenario_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::fixed("head", 4, 4),
            FieldDescriptor::array_of::<u32>("first"),
            FieldDescriptor::fixed("middle", 4, 4),
            FieldDescriptor::array_of::<u8>("second"),
            FieldDescriptor::fixed("tail", 4, 4),
        ]
    }

    fn mixed_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::of::<u8>("flag"),
            FieldDescriptor::array_of::<u16>("shorts"),
            FieldDescriptor::of::<u64>("id"),
            FieldDescriptor::array_of::<u8>("bytes"),
            FieldDescriptor::fixed("blob", 16, 16),
            FieldDescriptor::array_of::<u64>("longs"),
            FieldDescriptor::of::<u32>("count"),
        ]
    }

    fn names(layout: &RecordLayout) -> Vec<&str> {
        layout.fields().iter().map(|f| f.name.as_str()).collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Ordering
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_auto_order_is_stable_descending_alignment() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        assert_eq!(names(&layout), ["head", "first", "middle", "tail", "second"]);

        let layout = RecordLayout::auto(mixed_fields()).unwrap();
        assert_eq!(
            names(&layout),
            ["blob", "id", "longs", "count", "shorts", "flag", "bytes"]
        );
    }

    #[test]
    fn test_declared_order_is_kept() {
        let layout = RecordLayout::declared(scenario_fields()).unwrap();
        assert_eq!(names(&layout), ["head", "first", "middle", "second", "tail"]);
        assert_eq!(layout.mode(), LayoutMode::Declared);
    }

    #[test]
    fn test_overall_alignment_is_max() {
        assert_eq!(RecordLayout::auto(scenario_fields()).unwrap().overall_align(), 4);
        assert_eq!(RecordLayout::auto(mixed_fields()).unwrap().overall_align(), 16);
        assert_eq!(RecordLayout::declared(mixed_fields()).unwrap().overall_align(), 16);
    }

    #[test]
    fn test_empty_schema() {
        let layout = RecordLayout::auto(Vec::new()).unwrap();
        assert_eq!(layout.field_count(), 0);
        assert_eq!(layout.overall_align(), 1);
        assert_eq!(layout.calc_size(&layout.lengths()).unwrap(), 0);
        assert!(layout.spans(&layout.lengths()).unwrap().is_empty());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Offsets and sizes
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_scenario_offsets() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        let lengths = layout.lengths_from([("first", 2), ("second", 4)]).unwrap();

        assert_eq!(layout.offset_of(&lengths, "head").unwrap(), 0);
        assert_eq!(layout.offset_of(&lengths, "first").unwrap(), 4);
        assert_eq!(layout.size_of(&lengths, "first").unwrap(), 8);
        assert_eq!(layout.offset_of(&lengths, "middle").unwrap(), 12);
        assert_eq!(layout.offset_of(&lengths, "tail").unwrap(), 16);
        assert_eq!(layout.offset_of(&lengths, "second").unwrap(), 20);
        assert_eq!(layout.size_of(&lengths, "second").unwrap(), 4);
        assert_eq!(layout.calc_size(&lengths).unwrap(), 24);
    }

    #[test]
    fn test_calc_size_rounds_to_overall_alignment() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        let lengths = layout.lengths_from([("first", 2), ("second", 5)]).unwrap();
        // second ends at 25
        assert_eq!(layout.calc_size(&lengths).unwrap(), 28);
    }

    #[test]
    fn test_declared_mode_pads_field_starts() {
        let layout = RecordLayout::declared(scenario_fields()).unwrap();
        let lengths = layout.lengths_from([("first", 2), ("second", 3)]).unwrap();

        let second = layout.span_of(&lengths, "second").unwrap();
        assert_eq!(second, FieldSpan { offset: 16, size: 3 });
        // tail starts on its own alignment, not at 19
        assert_eq!(layout.offset_of(&lengths, "tail").unwrap(), 20);
        assert_eq!(layout.calc_size(&lengths).unwrap(), 24);
    }

    #[test]
    fn test_auto_offsets_are_prefix_sums() {
        let layout = RecordLayout::auto(mixed_fields()).unwrap();
        for (shorts, bytes, longs) in [(0, 0, 0), (1, 3, 1), (7, 13, 2), (64, 1, 9)] {
            let lengths = layout
                .lengths_from([("shorts", shorts), ("bytes", bytes), ("longs", longs)])
                .unwrap();
            let spans = layout.spans(&lengths).unwrap();
            let mut sum = 0;
            for span in &spans {
                assert_eq!(span.offset, sum);
                sum += span.size;
            }
        }
    }

    #[test]
    fn test_size_and_coverage_invariants() {
        for fields in [scenario_fields(), mixed_fields()] {
            for layout in [
                RecordLayout::auto(fields.clone()).unwrap(),
                RecordLayout::declared(fields.clone()).unwrap(),
            ] {
                let arrays: Vec<_> = layout
                    .fields()
                    .iter()
                    .filter(|f| f.is_variable())
                    .map(|f| f.name.clone())
                    .collect();
                for n in [0usize, 1, 2, 3, 5, 17] {
                    let mut lengths = layout.lengths();
                    for (i, name) in arrays.iter().enumerate() {
                        lengths.set(&layout, name, n + i).unwrap();
                    }
                    let total = layout.calc_size(&lengths).unwrap();
                    let spans = layout.spans(&lengths).unwrap();
                    let last = spans.last().unwrap();

                    assert_eq!(total % layout.overall_align(), 0);
                    assert_eq!(
                        total,
                        align_forward(last.end(), layout.overall_align()).unwrap()
                    );

                    let mut prev_end = 0;
                    for (span, field) in spans.iter().zip(layout.fields()) {
                        assert!(span.end() <= total);
                        assert!(span.offset >= prev_end, "regions overlap");
                        assert_eq!(span.offset % field.align, 0);
                        assert_eq!(
                            layout.span_of(&lengths, &field.name).unwrap(),
                            *span
                        );
                        prev_end = span.end();
                    }
                }
            }
        }
    }

    #[test]
    fn test_size_overflow() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        let lengths = layout.lengths_from([("first", usize::MAX / 2)]).unwrap();
        assert_eq!(
            layout.size_of(&lengths, "first"),
            Err(RecordError::SizeOverflow)
        );
        assert_eq!(layout.calc_size(&lengths), Err(RecordError::SizeOverflow));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_lookup_linear_and_binary() {
        let small = RecordLayout::auto(vec![
            FieldDescriptor::of::<u32>("a"),
            FieldDescriptor::of::<u64>("b"),
        ])
        .unwrap();
        assert_eq!(small.position("b"), Some(0));
        assert_eq!(small.position("a"), Some(1));
        assert_eq!(small.position("c"), None);

        let big = RecordLayout::auto(mixed_fields()).unwrap();
        for (pos, field) in big.fields().iter().enumerate() {
            assert_eq!(big.position(&field.name), Some(pos));
        }
        assert!(matches!(
            big.field("missing"),
            Err(RecordError::FieldNotFound(name)) if name == "missing"
        ));
        assert_eq!(big.field("id").unwrap().kind, FieldKind::Fixed { size: 8 });
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lengths
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_omitted_lengths_are_zero() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        let lengths = layout.lengths_from([("second", 4)]).unwrap();
        assert_eq!(lengths.get(&layout, "first").unwrap(), 0);
        assert_eq!(lengths.get(&layout, "second").unwrap(), 4);
        assert_eq!(layout.size_of(&lengths, "first").unwrap(), 0);
    }

    #[test]
    fn test_lengths_reject_fixed_and_unknown() {
        let layout = RecordLayout::auto(scenario_fields()).unwrap();
        let mut lengths = layout.lengths();
        assert_eq!(
            lengths.set(&layout, "head", 3).map(|_| ()),
            Err(RecordError::NotVariable("head".into()))
        );
        assert_eq!(
            lengths.set(&layout, "nope", 3).map(|_| ()),
            Err(RecordError::FieldNotFound("nope".into()))
        );
        assert_eq!(lengths.as_slice(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_lengths_from_other_layout_rejected() {
        let a = RecordLayout::auto(scenario_fields()).unwrap();
        let b = RecordLayout::declared(scenario_fields()).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());

        let lengths = a.lengths();
        assert_eq!(b.calc_size(&lengths), Err(RecordError::LayoutMismatch));
        assert_eq!(
            b.offset_of(&lengths, "tail"),
            Err(RecordError::LayoutMismatch)
        );
    }

    #[test]
    fn test_equal_schemas_share_fingerprint() {
        let a = RecordLayout::auto(scenario_fields()).unwrap();
        let b = RecordLayout::auto(scenario_fields()).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(b.calc_size(&a.lengths()).unwrap(), 12);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration errors
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_packed_and_extern_rejected() {
        for mode in [LayoutMode::Packed, LayoutMode::Extern] {
            assert!(matches!(
                RecordLayout::new(mode, scenario_fields()),
                Err(LayoutError::IncompatibleLayout(m)) if m == mode
            ));
        }
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut fields = scenario_fields();
        fields.push(FieldDescriptor::of::<u8>("middle"));
        assert!(matches!(
            RecordLayout::auto(fields),
            Err(LayoutError::DuplicateField(name)) if name == "middle"
        ));
    }

    #[test]
    fn test_bad_alignment_rejected() {
        for align in [0, 3, 12] {
            let err = RecordLayout::auto(vec![FieldDescriptor::fixed("x", 12, align)]);
            assert!(matches!(
                err,
                Err(LayoutError::InvalidAlignment { align: a, .. }) if a == align
            ));
        }
    }

    #[test]
    fn test_malformed_and_unsupported_fields_rejected() {
        assert!(matches!(
            RecordLayout::auto(vec![FieldDescriptor::fixed("x", 6, 4)]),
            Err(LayoutError::MalformedField { size: 6, align: 4, .. })
        ));
        assert!(matches!(
            RecordLayout::auto(vec![FieldDescriptor::variable("xs", 0, 1)]),
            Err(LayoutError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_too_many_fields() {
        let fields: Vec<_> = (0..=MAX_FIELDS)
            .map(|i| FieldDescriptor::of::<u8>(format!("f{i}")))
            .collect();
        assert!(matches!(
            RecordLayout::auto(fields),
            Err(LayoutError::TooManyFields)
        ));

        let fields: Vec<_> = (0..MAX_FIELDS)
            .map(|i| FieldDescriptor::of::<u8>(format!("f{i}")))
            .collect();
        let layout = RecordLayout::auto(fields).unwrap();
        assert_eq!(layout.calc_size(&layout.lengths()).unwrap(), MAX_FIELDS);
    }
}
