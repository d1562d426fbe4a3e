//! Layout through the public API, with a measurer defined outside the crate.

use simple_card::layout::{
    BlockKind, CanvasSpec, DrawOp, Extent, Face, Scene, TextMeasurer, compose,
};
use simple_card::types::LayoutInput;
use time::macros::datetime;

/// Every character is `size × 0.6` wide; text is one em tall.
struct Monospace;

impl TextMeasurer for Monospace {
    fn measure(&self, face: Face, text: &str) -> Extent {
        Extent {
            width: text.chars().count() as f32 * face.size * 0.6,
            height: face.size,
        }
    }
}

fn article(title: &str, tags: &[&str]) -> LayoutInput {
    LayoutInput {
        title: title.to_string(),
        author: "Mina".to_string(),
        category: "Essays".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: datetime!(2023-11-20 18:00 +09:00),
    }
}

fn texts(scene: &Scene) -> Vec<String> {
    scene.texts().map(str::to_string).collect()
}

#[test]
fn short_article_draws_every_block_once() {
    let scene = compose(&article("Notes", &["rust"]), &CanvasSpec::STANDARD, &Monospace);

    assert_eq!(
        texts(&scene),
        vec!["Notes", "Author: Mina", "Category: Essays", "#rust", "2023-11-20"]
    );
    assert_eq!(scene.chip_count(), 1);
    for kind in BlockKind::ORDER {
        assert!(scene.block(kind).is_some(), "{kind} missing");
    }
}

#[test]
fn long_cjk_title_wraps_without_losing_characters() {
    let title = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。";
    let scene = compose(&article(title, &[]), &CanvasSpec::STANDARD, &Monospace);

    let title_block = scene.block(BlockKind::Title).unwrap();
    assert!(title_block.items > 1);
    let lines: Vec<String> = scene
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { face, text, .. } if face.size == title_block.font_size => {
                Some(text.clone())
            }
            _ => None,
        })
        .take(title_block.items)
        .collect();
    assert_eq!(lines.concat(), title);
    for line in &lines {
        let face = Face::new(BlockKind::Title.role(), title_block.font_size);
        let width = Monospace.width(face, line);
        assert!(width <= CanvasSpec::STANDARD.available_width() + 1e-3);
    }
}

#[test]
fn date_stays_pinned_with_many_tags() {
    let tags = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    let scene = compose(&article("Tagged", &tags), &CanvasSpec::STANDARD, &Monospace);

    let date_baseline = scene
        .ops
        .iter()
        .rev()
        .find_map(|op| match op {
            DrawOp::Text { text, baseline, .. } if text == "2023-11-20" => Some(*baseline),
            _ => None,
        })
        .unwrap();
    assert_eq!(date_baseline, CanvasSpec::STANDARD.content_bottom());
    assert_eq!(scene.chip_count(), tags.len());
}

#[test]
fn same_input_same_scene() {
    let input = article("Repeatable", &["x", "y"]);
    let a = compose(&input, &CanvasSpec::STANDARD, &Monospace);
    let b = compose(&input, &CanvasSpec::STANDARD, &Monospace);
    assert_eq!(a, b);
}
