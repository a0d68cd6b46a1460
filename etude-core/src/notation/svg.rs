//! SVG engraving backend.
//!
//! Each draw call serialises its element group straight into the target's
//! display list; the GUI injects `RenderTarget::to_svg()` into the notation
//! container. Glyph metrics are fixed multiples of the stave line spacing.

use std::fmt::Write;

use super::backend::NotationBackend;
use super::layout::{
    Clef, NotationError, Stave, StaveNote, Voice, LINE_SPACING, TREBLE_BOTTOM_STEP,
    TREBLE_MIDDLE_STEP, TREBLE_TOP_STEP,
};
use super::target::{Drawing, RenderTarget};

const STROKE: &str = "#222";
const STAFF_STROKE: &str = "#999";
const NOTEHEAD_WIDTH: f32 = 12.0;
const NOTEHEAD_RX: f32 = 6.0;
const NOTEHEAD_RY: f32 = 4.5;
const LEDGER_OVERHANG: f32 = 4.0;
const STEM_LENGTH: f32 = 3.5 * LINE_SPACING;
const FLAG_SPACING: f32 = 8.0;
const CLEF_FONT_SIZE: f32 = 62.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgBackend;

impl SvgBackend {
    pub fn new() -> Self {
        Self
    }
}

impl NotationBackend for SvgBackend {
    fn open_context(
        &mut self,
        target: &mut RenderTarget,
        width: u32,
        height: u32,
    ) -> Result<(), NotationError> {
        target.resize(width, height);
        Ok(())
    }

    fn draw_stave(&mut self, target: &mut RenderTarget, stave: &Stave) -> Result<(), NotationError> {
        target.push(Drawing::Stave {
            markup: stave_markup(stave),
        })
    }

    fn draw_voice(
        &mut self,
        target: &mut RenderTarget,
        stave: &Stave,
        voice: &Voice,
    ) -> Result<(), NotationError> {
        let mut markup = String::from(r#"<g class="voice">"#);
        for note in voice.notes() {
            // Unformatted notes have nowhere to go.
            let Some(x) = note.x else {
                continue;
            };
            note_markup(&mut markup, stave, note, x);
        }
        markup.push_str("</g>");
        target.push(Drawing::Voice {
            notes: voice.notes().len(),
            markup,
        })
    }
}

fn line(out: &mut String, x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str) {
    let _ = write!(
        out,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
        x1, y1, x2, y2, stroke
    );
}

fn stave_markup(stave: &Stave) -> String {
    let mut out = String::from(r#"<g class="stave">"#);
    let left = stave.x;
    let right = stave.x + stave.width;
    for i in 0..5 {
        let y = stave.line_y(i);
        line(&mut out, left, y, right, y, STAFF_STROKE);
    }
    let (top, bottom) = (stave.top_line_y(), stave.bottom_line_y());
    line(&mut out, left, top, left, bottom, STROKE);
    line(&mut out, right, top, right, bottom, STROKE);

    if let Some(Clef::Treble) = stave.clef {
        let _ = write!(
            out,
            r#"<text class="clef" x="{:.1}" y="{:.1}" font-size="{}" font-family="serif" fill="{}">&#x1D11E;</text>"#,
            left + 2.0,
            bottom + LINE_SPACING,
            CLEF_FONT_SIZE,
            STROKE
        );
    }
    out.push_str("</g>");
    out
}

/// Staff steps needing a ledger line for a note at `step`.
fn ledger_steps(step: i32) -> Vec<i32> {
    if step < TREBLE_BOTTOM_STEP {
        (step..TREBLE_BOTTOM_STEP)
            .filter(|s| (TREBLE_BOTTOM_STEP - s) % 2 == 0)
            .collect()
    } else if step > TREBLE_TOP_STEP {
        (TREBLE_TOP_STEP + 1..=step)
            .filter(|s| (s - TREBLE_TOP_STEP) % 2 == 0)
            .collect()
    } else {
        Vec::new()
    }
}

fn note_markup(out: &mut String, stave: &Stave, note: &StaveNote, x: f32) {
    let key = note
        .keys
        .iter()
        .map(|p| p.notation_key())
        .collect::<Vec<_>>()
        .join(",");
    let _ = write!(
        out,
        r#"<g class="note" data-key="{}" data-duration="{}">"#,
        key,
        note.duration.notation_code()
    );

    let mut lowest: Option<i32> = None;
    let mut highest: Option<i32> = None;
    for pitch in &note.keys {
        let step = pitch.staff_step();
        lowest = Some(lowest.map_or(step, |l| l.min(step)));
        highest = Some(highest.map_or(step, |h| h.max(step)));
        let y = stave.y_for_step(step);

        for ledger in ledger_steps(step) {
            let ly = stave.y_for_step(ledger);
            line(out, x - LEDGER_OVERHANG, ly, x + NOTEHEAD_WIDTH + LEDGER_OVERHANG, ly, STROKE);
        }

        if pitch.class.is_accidental() {
            let _ = write!(
                out,
                r#"<text class="accidental" x="{:.1}" y="{:.1}" font-size="16" fill="{}">&#x266F;</text>"#,
                x - NOTEHEAD_WIDTH,
                y + 5.0,
                STROKE
            );
        }

        let cx = x + NOTEHEAD_RX;
        let fill = if note.duration.is_hollow() { "none" } else { STROKE };
        let _ = write!(
            out,
            r#"<ellipse cx="{:.1}" cy="{:.1}" rx="{}" ry="{}" fill="{}" stroke="{}" transform="rotate(-20 {:.1} {:.1})"/>"#,
            cx, y, NOTEHEAD_RX, NOTEHEAD_RY, fill, STROKE, cx, y
        );
    }

    if let (Some(low), Some(high), true) = (lowest, highest, note.duration.has_stem()) {
        // Notes on or above the middle line take a down stem.
        let stem_up = high < TREBLE_MIDDLE_STEP
            || (TREBLE_MIDDLE_STEP - low) > (high - TREBLE_MIDDLE_STEP);
        let (sx, from, to) = if stem_up {
            (x + NOTEHEAD_WIDTH, stave.y_for_step(low), stave.y_for_step(high) - STEM_LENGTH)
        } else {
            (x, stave.y_for_step(high), stave.y_for_step(low) + STEM_LENGTH)
        };
        line(out, sx, from, sx, to, STROKE);

        for i in 0..note.duration.flags() {
            let offset = i as f32 * FLAG_SPACING;
            let (fy, dy) = if stem_up { (to + offset, 1.0) } else { (to - offset, -1.0) };
            let _ = write!(
                out,
                r#"<path d="M{:.1} {:.1} q 8 {:.1} 8 {:.1}" fill="none" stroke="{}"/>"#,
                sx,
                fy,
                10.0 * dy,
                20.0 * dy,
                STROKE
            );
        }
    }
    out.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use etude_types::{NoteDuration, Pitch, PitchClass};

    fn formatted_voice(notes: Vec<StaveNote>, beats: u32) -> (Stave, Voice) {
        let stave = Stave::new(10.0, 40.0, 480.0).with_clef(Clef::Treble);
        let mut voice = Voice::new(beats, 4).unwrap();
        voice.add_tickables(notes).unwrap();
        super::super::layout::Formatter::format(std::slice::from_mut(&mut voice), &stave, 450.0)
            .unwrap();
        (stave, voice)
    }

    #[test]
    fn ledger_lines_below_and_above() {
        // C4 takes one ledger line, A3 two.
        assert_eq!(ledger_steps(28), vec![28]);
        assert_eq!(ledger_steps(26), vec![26, 28]);
        assert!(ledger_steps(30).is_empty());
        assert!(ledger_steps(38).is_empty());
        // A5 sits on the first ledger line above.
        assert_eq!(ledger_steps(40), vec![40]);
    }

    #[test]
    fn stave_has_five_lines_and_clef() {
        let mut target = RenderTarget::default();
        let mut svg = SvgBackend::new();
        svg.open_context(&mut target, 500, 200).unwrap();
        let stave = Stave::new(10.0, 40.0, 480.0).with_clef(Clef::Treble);
        svg.draw_stave(&mut target, &stave).unwrap();
        let out = target.to_svg();
        assert_eq!(out.matches(STAFF_STROKE).count(), 5);
        assert!(out.contains("&#x1D11E;"));
    }

    #[test]
    fn voice_draws_one_group_per_note() {
        let notes = vec![
            StaveNote::new(vec![Pitch::new(PitchClass::C, 4)], NoteDuration::Quarter),
            StaveNote::new(vec![Pitch::new(PitchClass::Fs, 4)], NoteDuration::Quarter),
            StaveNote::new(vec![Pitch::new(PitchClass::C, 5)], NoteDuration::Half),
        ];
        let (stave, voice) = formatted_voice(notes, 4);
        let mut target = RenderTarget::default();
        let mut svg = SvgBackend::new();
        svg.open_context(&mut target, 500, 200).unwrap();
        svg.draw_voice(&mut target, &stave, &voice).unwrap();

        let out = target.to_svg();
        assert_eq!(out.matches(r#"class="note""#).count(), 3);
        assert_eq!(out.matches("<ellipse").count(), 3);
        assert_eq!(out.matches("&#x266F;").count(), 1);
        assert!(out.contains(r#"data-key="c/4""#));
        assert!(out.contains(r#"data-key="f#/4""#));
        // The half note is hollow.
        assert!(out.contains(r##"fill="none" stroke="#222" transform"##));
        assert_eq!(target.voice_note_counts(), vec![3]);
    }

    #[test]
    fn eighth_notes_get_a_flag() {
        let notes = vec![
            StaveNote::new(vec![Pitch::new(PitchClass::E, 4)], NoteDuration::Eighth),
            StaveNote::new(vec![Pitch::new(PitchClass::G, 4)], NoteDuration::Eighth),
        ];
        let (stave, voice) = formatted_voice(notes, 1);
        let mut target = RenderTarget::default();
        let mut svg = SvgBackend::new();
        svg.open_context(&mut target, 500, 200).unwrap();
        svg.draw_voice(&mut target, &stave, &voice).unwrap();
        assert_eq!(target.to_svg().matches("<path").count(), 2);
    }

    #[test]
    fn drawing_without_context_fails() {
        let mut target = RenderTarget::default();
        let stave = Stave::new(0.0, 0.0, 100.0);
        let err = SvgBackend::new().draw_stave(&mut target, &stave).unwrap_err();
        assert!(matches!(err, NotationError::NoContext));
    }
}
