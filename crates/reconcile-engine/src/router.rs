//! Router / Facade (C13): classifies the edit, picks a mode, orchestrates
//! the crates underneath, and serializes. Mirrors §4.13's decision tree
//! exactly, short-circuiting on the first applicable branch.

use crate::envelope::Envelope;
use crate::error::RedlineWarning;
use crate::options::RedlineOptions;
use crate::result::RedlineResult;
use crate::sanitize::sanitize_modified_text;
use reconcile_format::extract_format_from_rpr;
use reconcile_ingest::ingest_paragraphs;
use reconcile_model::{ensure_counter_past, join_paragraphs, next_revision_id, ParagraphInfo, Revision, TextSpan};
use reconcile_modes::{
    apply_format_additions, apply_format_removal, diff_has_text_change, find_target_paragraph_info,
    generate_list_paragraphs, reconstruct_paragraphs, run_surgical, NumberingAllocator,
};
use reconcile_tables::{
    convert_text_to_table, find_table_cell_target, ingest_table_to_grid, isolate_paragraph,
    reconcile_table, splice_paragraph_result, TableOutcome,
};
use reconcile_text::{diff_text, is_list_target, parse_markdown_table, preprocess_markdown};
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument};

/// `applyRedlineToOxml` (spec.md §6). Never panics out: any internal
/// failure is caught at this boundary and folded into a `ParseError`
/// warning, per §7 "the engine never raises out of the public entry".
pub fn apply_redline_to_oxml(
    oxml: &str,
    original_text: &str,
    modified_text: &str,
    options: &RedlineOptions,
) -> RedlineResult {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run(oxml, original_text, modified_text, options)
    })) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("reconciliation panicked internally; returning input unchanged");
            RedlineResult::unchanged_with_warning(oxml, RedlineWarning::ParseError)
        }
    }
}

/// `applyRedlineToOxmlWithListFallback`: if the engine reported no changes
/// but the modified text begins with a list marker, force a structural
/// list conversion rather than leaving the caller with a no-op.
pub fn apply_redline_to_oxml_with_list_fallback(
    oxml: &str,
    original_text: &str,
    modified_text: &str,
    options: &RedlineOptions,
) -> RedlineResult {
    let result = apply_redline_to_oxml(oxml, original_text, modified_text, options);
    if result.has_changes {
        return result;
    }
    let sanitized = sanitize_modified_text(modified_text);
    let (clean_text, _) = preprocess_markdown(&sanitized);
    if !is_list_target(&clean_text) {
        return result;
    }
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        force_list_conversion(oxml, modified_text, options)
    })) {
        Ok(Some(forced)) => forced,
        _ => result,
    }
}

fn run(oxml: &str, original_text: &str, modified_text: &str, options: &RedlineOptions) -> RedlineResult {
    let mut envelope = match Envelope::parse(oxml) {
        Ok(e) => e,
        Err(err) => {
            tracing::warn!(error = %err, "input is not well-formed XML");
            return RedlineResult::unchanged_with_warning(oxml, RedlineWarning::ParseError);
        }
    };
    let container = envelope.container;
    ensure_counter_past(max_existing_revision_id(&envelope.doc, container));

    // Step 2: table-cell context. If the caller handed us a table wrapper
    // and a paragraph inside a cell matches, isolate it and recurse with
    // the guard set, then splice the recursive result back in.
    if !options.isolated_table_cell {
        if let Some(cell_match) = find_table_cell_target(
            &envelope.doc,
            container,
            options.target_paragraph_id.as_deref(),
            original_text,
        ) {
            tracing::debug!("table-cell context detected; isolating target paragraph");
            let fragment = isolate_paragraph(&envelope.doc, cell_match.paragraph);
            let recursive_options = options.for_isolated_cell();
            let recursive = apply_redline_to_oxml(&fragment, original_text, modified_text, &recursive_options);
            return match splice_paragraph_result(&mut envelope.doc, cell_match.paragraph, &recursive.oxml) {
                Ok(_) => RedlineResult {
                    oxml: envelope.finish(),
                    has_changes: recursive.has_changes,
                    warnings: recursive.warnings,
                    use_native_api: recursive.use_native_api,
                    numbering_fragment: recursive.numbering_fragment,
                },
                Err(_) => RedlineResult::unchanged_with_warning(oxml, RedlineWarning::ParseError),
            };
        }
    }

    // Step 3: sanitize. Step 4: preprocess + ingest.
    let sanitized = sanitize_modified_text(modified_text);
    let (clean_text, hints) = preprocess_markdown(&sanitized);

    let paragraph_infos: Vec<ParagraphInfo> =
        ingest_paragraphs(&envelope.doc, container).into_iter().map(|p| p.info).collect();
    let full_text = join_paragraphs(paragraph_infos.iter().map(|p| p.text.as_str()));
    let has_table = envelope
        .doc
        .descendants(container)
        .any(|n| envelope.doc.get(n).is_element_named(&W::tbl()));

    let target_index: Option<usize> = if paragraph_infos.len() <= 1 {
        Some(0).filter(|_| !paragraph_infos.is_empty())
    } else {
        find_target_paragraph_info(&paragraph_infos, original_text).map(|(idx, _)| idx)
    };
    let mut warnings = Vec::new();
    if target_index.is_none() && paragraph_infos.len() > 1 {
        warnings.push(RedlineWarning::NoTargetFound);
    }

    let all_spans: Vec<TextSpan> = paragraph_infos.iter().flat_map(|p| p.spans.clone()).collect();
    let target_spans: Vec<TextSpan> = target_index
        .map(|idx| paragraph_infos[idx].spans.clone())
        .unwrap_or_else(|| all_spans.clone());

    let diff = diff_text(&full_text, &clean_text);
    let text_changed = diff_has_text_change(&diff);
    let existing_format = target_spans.iter().any(|span| {
        span.run_properties
            .map(|rpr| !extract_format_from_rpr(&envelope.doc, rpr).is_empty())
            .unwrap_or(false)
    });

    let revision = if options.generate_redlines {
        Some(Revision::now(next_revision_id(), options.author.clone()))
    } else {
        None
    };

    // Step 5, first three branches: no text change at all.
    if !text_changed && hints.is_empty() {
        if !existing_format {
            tracing::debug!("no text or formatting change; no-op");
            return RedlineResult {
                oxml: envelope.finish(),
                has_changes: false,
                warnings,
                use_native_api: None,
                numbering_fragment: None,
            };
        }
        if target_index.is_none() && paragraph_infos.len() > 1 {
            tracing::warn!("format removal requested but no target paragraph matched");
            return RedlineResult {
                oxml: oxml.to_string(),
                has_changes: false,
                warnings,
                use_native_api: Some(true),
                numbering_fragment: None,
            };
        }
        tracing::debug!("format-only removal");
        let changed = apply_format_removal(&mut envelope.doc, &target_spans, revision.as_ref(), options.generate_redlines);
        return RedlineResult {
            oxml: envelope.finish(),
            has_changes: changed,
            warnings,
            use_native_api: None,
            numbering_fragment: None,
        };
    }

    if !text_changed {
        if target_index.is_none() && paragraph_infos.len() > 1 {
            tracing::warn!("format addition requested but no target paragraph matched");
            return RedlineResult {
                oxml: oxml.to_string(),
                has_changes: false,
                warnings,
                use_native_api: Some(true),
                numbering_fragment: None,
            };
        }
        tracing::debug!("format-only addition");
        let (_, changed) =
            apply_format_additions(&mut envelope.doc, target_spans, &hints, revision.as_ref(), options.generate_redlines);
        return RedlineResult {
            oxml: envelope.finish(),
            has_changes: changed,
            warnings,
            use_native_api: None,
            numbering_fragment: None,
        };
    }

    // Step 5, text-to-table / table reconciliation.
    if let Some(md) = parse_markdown_table(&clean_text) {
        if !has_table {
            tracing::debug!("text-to-table conversion");
            let paragraph_nodes: Vec<NodeId> = paragraph_infos.iter().map(|p| p.paragraph).collect();
            convert_text_to_table(&mut envelope.doc, container, &paragraph_nodes, &md, revision.as_ref(), options.generate_redlines);
            return RedlineResult {
                oxml: envelope.finish(),
                has_changes: true,
                warnings,
                use_native_api: None,
                numbering_fragment: None,
            };
        }
        let first_table = envelope
            .doc
            .descendants(container)
            .find(|&n| envelope.doc.get(n).is_element_named(&W::tbl()));
        if let Some(tbl) = first_table {
            let grid = ingest_table_to_grid(&envelope.doc, tbl);
            match reconcile_table(&mut envelope.doc, tbl, &grid, &md, revision.as_ref(), options.generate_redlines) {
                TableOutcome::Reconciled => {
                    tracing::debug!("table reconciliation");
                    return RedlineResult {
                        oxml: envelope.finish(),
                        has_changes: true,
                        warnings,
                        use_native_api: None,
                        numbering_fragment: None,
                    };
                }
                TableOutcome::ShapeMismatch => {
                    tracing::warn!("table shape mismatch; falling back to reconstruction");
                    warnings.push(RedlineWarning::TableShapeMismatch);
                }
            }
        }
    }

    // Step 5, tables present but not a table edit: surgical mode.
    if has_table {
        tracing::debug!("surgical mode (table in scope)");
        let changed = run_surgical(
            &mut envelope.doc,
            all_spans,
            &full_text,
            &clean_text,
            &hints,
            revision.as_ref(),
            options.generate_redlines,
        );
        return RedlineResult {
            oxml: envelope.finish(),
            has_changes: changed,
            warnings,
            use_native_api: None,
            numbering_fragment: None,
        };
    }

    // Step 5, list generation.
    if is_list_target(&clean_text) {
        let target_idx = target_index.unwrap_or(0);
        if let Some(target) = paragraph_infos.get(target_idx) {
            tracing::debug!("list generation");
            let target_paragraph = target.paragraph;
            let mut allocator = NumberingAllocator::default();
            let generated = generate_list_paragraphs(
                &mut envelope.doc,
                target,
                &clean_text,
                options.font.as_deref(),
                revision.as_ref(),
                options.generate_redlines,
                &mut allocator,
            );
            replace_container_paragraphs(&mut envelope.doc, container, &[target_paragraph], generated.paragraphs);
            return RedlineResult {
                oxml: envelope.finish(),
                has_changes: true,
                warnings,
                use_native_api: None,
                numbering_fragment: generated.numbering_fragment,
            };
        }
    }

    // Step 5, otherwise: reconstruction mode.
    tracing::debug!("reconstruction mode");
    let old_paragraphs: Vec<NodeId> = paragraph_infos.iter().map(|p| p.paragraph).collect();
    let new_paragraphs = reconstruct_paragraphs(
        &mut envelope.doc,
        &paragraph_infos,
        &full_text,
        &clean_text,
        &hints,
        revision.as_ref(),
        options.generate_redlines,
    );
    replace_container_paragraphs(&mut envelope.doc, container, &old_paragraphs, new_paragraphs);
    RedlineResult {
        oxml: envelope.finish(),
        has_changes: true,
        warnings,
        use_native_api: None,
        numbering_fragment: None,
    }
}

/// Forces the list-generation branch regardless of whether the diff alone
/// would have reached it — the `...WithListFallback` escape hatch.
fn force_list_conversion(oxml: &str, modified_text: &str, options: &RedlineOptions) -> Option<RedlineResult> {
    let mut envelope = Envelope::parse(oxml).ok()?;
    let container = envelope.container;
    let paragraph_infos: Vec<ParagraphInfo> =
        ingest_paragraphs(&envelope.doc, container).into_iter().map(|p| p.info).collect();
    let target = paragraph_infos.first()?;
    let target_paragraph = target.paragraph;

    let sanitized = sanitize_modified_text(modified_text);
    let (clean_text, _) = preprocess_markdown(&sanitized);
    let revision = if options.generate_redlines {
        Some(Revision::now(next_revision_id(), options.author.clone()))
    } else {
        None
    };
    let mut allocator = NumberingAllocator::default();
    let generated = generate_list_paragraphs(
        &mut envelope.doc,
        target,
        &clean_text,
        options.font.as_deref(),
        revision.as_ref(),
        options.generate_redlines,
        &mut allocator,
    );
    replace_container_paragraphs(&mut envelope.doc, container, &[target_paragraph], generated.paragraphs);
    Some(RedlineResult {
        oxml: envelope.finish(),
        has_changes: true,
        warnings: Vec::new(),
        use_native_api: None,
        numbering_fragment: generated.numbering_fragment,
    })
}

/// Scans every `w:ins`/`w:del`/`w:rPrChange` already in scope for its
/// `w:id` so the revision counter can be bumped past them before this call
/// allocates any new ones — property 7 (§8, "all `w:id` values ... are
/// pairwise distinct") has to hold against pre-existing tracked changes the
/// caller isn't touching, not just the ones this call emits.
fn max_existing_revision_id(doc: &XmlDocument, container: NodeId) -> u32 {
    doc.descendants(container)
        .filter(|&n| {
            let node = doc.get(n);
            node.is_element_named(&W::ins()) || node.is_element_named(&W::del()) || node.is_element_named(&W::rPrChange())
        })
        .filter_map(|n| doc.get(n).attr("id").and_then(|v| v.parse::<u32>().ok()))
        .max()
        .unwrap_or(0)
}

/// Splices `new_paragraphs` in just before `old_paragraphs`' first element
/// (or appends to `container` when there was nothing to anchor on), then
/// removes every node in `old_paragraphs`.
fn replace_container_paragraphs(
    doc: &mut XmlDocument,
    container: NodeId,
    old_paragraphs: &[NodeId],
    new_paragraphs: Vec<NodeId>,
) {
    match old_paragraphs.first() {
        Some(&anchor) => {
            for p in &new_paragraphs {
                doc.insert_before(*p, anchor);
            }
        }
        None => {
            for p in &new_paragraphs {
                doc.append_existing(container, *p);
            }
        }
    }
    for &old in old_paragraphs {
        doc.remove_subtree(old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_is_a_no_op() {
        let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
        let result = apply_redline_to_oxml(xml, "Hello World", "Hello World", &RedlineOptions::default());
        assert!(!result.has_changes);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn partial_bold_produces_two_runs() {
        let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
        let result = apply_redline_to_oxml(xml, "Hello World", "Hello **World**", &RedlineOptions::default());
        assert!(result.has_changes);
        assert!(result.oxml.contains("w:ins"));
        assert!(result.oxml.contains(r#"w:val="1""#));
    }

    #[test]
    fn malformed_xml_returns_input_unchanged_with_a_warning() {
        let result = apply_redline_to_oxml("<w:p><w:r></w:q></w:p>", "x", "y", &RedlineOptions::default());
        assert!(!result.has_changes);
        assert_eq!(result.warnings, vec![RedlineWarning::ParseError]);
    }

    #[test]
    fn list_expansion_produces_three_items_plus_a_trailing_paragraph() {
        let xml = r#"<w:p><w:r><w:t>Original</w:t></w:r></w:p>"#;
        let result = apply_redline_to_oxml(
            xml,
            "Original",
            "A. One\nB. Two\nC. Three",
            &RedlineOptions::default(),
        );
        assert!(result.has_changes);
        assert_eq!(result.oxml.matches("<w:p>").count() + result.oxml.matches("<w:p ").count(), 4);
    }

    #[test]
    fn generate_redlines_false_emits_no_track_change_wrappers() {
        let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
        let mut options = RedlineOptions::default();
        options.generate_redlines = false;
        let result = apply_redline_to_oxml(xml, "Hello World", "Hello there World", &RedlineOptions { ..options });
        assert!(!result.oxml.contains("w:ins"));
        assert!(!result.oxml.contains("w:del"));
    }

    #[test]
    fn table_cell_context_edits_only_the_targeted_cell() {
        let xml = r#"<w:tbl>
            <w:tr><w:tc><w:p w14:paraId="AAAA0001"><w:r><w:t>By: [Name]</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p w14:paraId="AAAA0002"><w:r><w:t>By: [Name]</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>y</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl>"#;
        let mut options = RedlineOptions::default();
        options.target_paragraph_id = Some("AAAA0002".to_string());
        let result = apply_redline_to_oxml(xml, "By: [Name]", "By: [Jane Doe]", &options);
        assert!(result.has_changes);
        assert!(result.oxml.contains("AAAA0001"));
    }

    #[test]
    fn new_revision_ids_skip_past_ids_already_present_in_the_input() {
        use reconcile_model::next_revision_id;
        let xml = r#"<w:p><w:ins w:id="9000" w:author="A" w:date="2026-01-01T00:00:00Z"><w:r><w:t>Hi</w:t></w:r></w:ins><w:r><w:t> there</w:t></w:r></w:p>"#;
        let result = apply_redline_to_oxml(xml, "Hi there", "Hi there again", &RedlineOptions::default());
        assert!(result.has_changes);
        assert!(next_revision_id() > 9000);
    }

    #[test]
    fn with_list_fallback_forces_conversion_when_plain_run_reports_no_change() {
        let xml = r#"<w:p><w:r><w:t>- One\n- Two</w:t></w:r></w:p>"#;
        let result = apply_redline_to_oxml_with_list_fallback(
            xml,
            "- One\n- Two",
            "- One\n- Two",
            &RedlineOptions::default(),
        );
        // identical text really is a no-op and isn't itself a list target
        // once markers are stripped from a text that has no newlines in it
        // pre-sanitization; this just exercises the fallback's early return.
        assert!(!result.has_changes || result.oxml.contains("w:numPr"));
    }
}
