//! Keyed plot elements that persist across frames.
//!
//! Each recompute hands the scene the curves it should show. The scene
//! diffs them against what is on screen by key: known keys tween toward
//! their new curve, new keys fade in, missing keys fade out and are dropped
//! once invisible. The painter only ever reads the current elements.

use egui::Color32;

use crate::config::WORLD_ID;
use crate::frame::DensityCurve;
use crate::themes::palette;

/// How strongly an element is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// The all-federation backdrop.
    Muted,
    /// An explicitly selected region.
    Highlight,
}

impl Emphasis {
    pub fn for_key(key: &str) -> Self {
        if key == WORLD_ID {
            Emphasis::Muted
        } else {
            Emphasis::Highlight
        }
    }

    pub fn fill_alpha(self) -> f32 {
        match self {
            Emphasis::Muted => 0.15,
            Emphasis::Highlight => 0.3,
        }
    }

    pub fn stroke_width(self) -> f32 {
        match self {
            Emphasis::Muted => 1.0,
            Emphasis::Highlight => 2.0,
        }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Emphasis::Muted => 0.6,
            Emphasis::Highlight => 1.0,
        }
    }
}

pub fn color_for(key: &str) -> Color32 {
    match Emphasis::for_key(key) {
        Emphasis::Muted => palette::NEUTRAL,
        Emphasis::Highlight => palette::categorical(key),
    }
}

/// Instruction emitted by [`Scene::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneOp {
    Add(String),
    Update(String),
    Remove(String),
}

/// One keyed group of visuals: filled area, outline and mean marker.
#[derive(Clone, Debug)]
pub struct SceneElement {
    pub key: String,
    pub label: String,
    pub color: Color32,
    pub emphasis: Emphasis,
    /// The curve as currently drawn.
    pub points: Vec<[f64; 2]>,
    /// The mean marker as currently drawn.
    pub mean: f64,
    /// 0 is invisible, 1 fully shown.
    pub visibility: f32,
    pub exiting: bool,
    from: Vec<[f64; 2]>,
    target: Vec<[f64; 2]>,
    mean_from: f64,
    mean_target: f64,
    progress: f32,
}

impl SceneElement {
    fn new(curve: &DensityCurve) -> Self {
        let emphasis = Emphasis::for_key(&curve.key);
        Self {
            key: curve.key.clone(),
            label: curve.name.clone(),
            color: color_for(&curve.key),
            emphasis,
            points: curve.points.clone(),
            mean: curve.mean,
            visibility: 0.0,
            exiting: false,
            from: curve.points.clone(),
            target: curve.points.clone(),
            mean_from: curve.mean,
            mean_target: curve.mean,
            progress: 1.0,
        }
    }

    fn retarget(&mut self, curve: &DensityCurve) {
        self.label = curve.name.clone();
        self.exiting = false;
        if self.points.len() == curve.points.len() {
            self.from = self.points.clone();
            self.mean_from = self.mean;
            self.progress = 0.0;
        } else {
            self.points = curve.points.clone();
            self.from = curve.points.clone();
            self.mean = curve.mean;
            self.mean_from = curve.mean;
            self.progress = 1.0;
        }
        self.target = curve.points.clone();
        self.mean_target = curve.mean;
    }

    /// Steps fade and tween; returns whether anything is still moving.
    fn advance(&mut self, step: f32) -> bool {
        let goal = if self.exiting { 0.0 } else { 1.0 };
        self.visibility = approach(self.visibility, goal, step);

        if self.progress < 1.0 {
            self.progress = (self.progress + step).min(1.0);
            let t = ease(self.progress) as f64;
            for ((shown, from), to) in self.points.iter_mut().zip(&self.from).zip(&self.target) {
                shown[0] = from[0] + (to[0] - from[0]) * t;
                shown[1] = from[1] + (to[1] - from[1]) * t;
            }
            self.mean = self.mean_from + (self.mean_target - self.mean_from) * t;
        }

        self.visibility != goal || self.progress < 1.0
    }

    /// Alpha for this element's visuals, combining fade and emphasis.
    pub fn alpha(&self) -> f32 {
        self.visibility * self.emphasis.opacity()
    }
}

fn approach(current: f32, goal: f32, step: f32) -> f32 {
    if current < goal {
        (current + step).min(goal)
    } else {
        (current - step).max(goal)
    }
}

fn ease(t: f32) -> f32 {
    // cubic in-out
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub key: String,
    pub label: String,
    pub color: Color32,
    pub mean: f64,
    pub sample_count: usize,
}

#[derive(Debug)]
pub struct Scene {
    elements: Vec<SceneElement>,
    legend: Vec<LegendItem>,
    fade_seconds: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl Scene {
    pub fn new(fade_seconds: f32) -> Self {
        Self {
            elements: Vec::new(),
            legend: Vec::new(),
            fade_seconds: fade_seconds.max(f32::EPSILON),
        }
    }

    /// Diffs `curves` against the elements on screen and retargets them.
    pub fn apply(&mut self, curves: &[DensityCurve]) -> Vec<SceneOp> {
        let mut ops = Vec::new();
        let mut previous = std::mem::take(&mut self.elements);
        let mut next = Vec::with_capacity(curves.len() + previous.len());

        for curve in curves {
            match previous.iter().position(|e| e.key == curve.key) {
                Some(slot) => {
                    let mut element = previous.swap_remove(slot);
                    ops.push(if element.exiting {
                        SceneOp::Add(curve.key.clone())
                    } else {
                        SceneOp::Update(curve.key.clone())
                    });
                    element.retarget(curve);
                    next.push(element);
                }
                None => {
                    ops.push(SceneOp::Add(curve.key.clone()));
                    next.push(SceneElement::new(curve));
                }
            }
        }

        for mut element in previous {
            if !element.exiting {
                ops.push(SceneOp::Remove(element.key.clone()));
                element.exiting = true;
            }
            next.push(element);
        }

        // The backdrop goes first so selected regions paint over it.
        next.sort_by_key(|e| e.emphasis != Emphasis::Muted);
        self.elements = next;

        self.legend = curves
            .iter()
            .map(|curve| LegendItem {
                key: curve.key.clone(),
                label: curve.name.clone(),
                color: color_for(&curve.key),
                mean: curve.mean,
                sample_count: curve.sample_count,
            })
            .collect();

        log::trace!("scene ops: {ops:?}");
        ops
    }

    /// Moves every fade and tween forward by `dt` seconds and drops fully
    /// faded-out elements. Returns whether another step is needed.
    pub fn advance(&mut self, dt: f32) -> bool {
        let step = dt / self.fade_seconds;
        let mut animating = false;
        for element in &mut self.elements {
            animating |= element.advance(step);
        }
        self.elements
            .retain(|e| !(e.exiting && e.visibility <= 0.0));
        animating
    }

    /// Jumps every element to its end state.
    pub fn settle(&mut self) {
        self.advance(f32::MAX);
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn element(&self, key: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.key == key)
    }

    pub fn legend(&self) -> &[LegendItem] {
        &self.legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(key: &str, peak: f64) -> DensityCurve {
        DensityCurve {
            key: key.to_owned(),
            name: key.to_owned(),
            points: vec![[0.0, 0.0], [1.0, peak], [2.0, 0.0]],
            mean: peak * 10.0,
            sample_count: 21,
        }
    }

    #[test]
    fn new_keys_are_added_and_fade_in() {
        let mut scene = Scene::new(0.3);
        let ops = scene.apply(&[curve("World", 1.0), curve("IND", 2.0)]);
        assert_eq!(
            ops,
            vec![SceneOp::Add("World".into()), SceneOp::Add("IND".into())]
        );
        assert_eq!(scene.element("IND").unwrap().visibility, 0.0);
        assert!(scene.advance(0.15));
        let half = scene.element("IND").unwrap().visibility;
        assert!(half > 0.4 && half < 0.6);
        scene.settle();
        assert_eq!(scene.element("IND").unwrap().visibility, 1.0);
    }

    #[test]
    fn known_keys_keep_identity_and_tween() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("IND", 1.0)]);
        scene.settle();

        let ops = scene.apply(&[curve("IND", 3.0)]);
        assert_eq!(ops, vec![SceneOp::Update("IND".into())]);
        assert_eq!(scene.elements().len(), 1);
        assert_eq!(scene.element("IND").unwrap().points[1][1], 1.0);

        scene.advance(0.15);
        let mid = scene.element("IND").unwrap().points[1][1];
        assert!(mid > 1.0 && mid < 3.0);

        scene.settle();
        let element = scene.element("IND").unwrap();
        assert_eq!(element.points[1][1], 3.0);
        assert_eq!(element.mean, 30.0);
    }

    #[test]
    fn missing_keys_fade_out_then_disappear() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("World", 1.0), curve("IND", 1.0)]);
        scene.settle();

        let ops = scene.apply(&[curve("World", 1.0)]);
        assert_eq!(
            ops,
            vec![SceneOp::Update("World".into()), SceneOp::Remove("IND".into())]
        );
        assert!(scene.element("IND").unwrap().exiting);
        assert_eq!(scene.legend().len(), 1);

        scene.settle();
        assert!(scene.element("IND").is_none());
    }

    #[test]
    fn exiting_key_can_come_back() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("IND", 1.0)]);
        scene.settle();
        scene.apply(&[]);
        scene.advance(0.1);

        let ops = scene.apply(&[curve("IND", 1.0)]);
        assert_eq!(ops, vec![SceneOp::Add("IND".into())]);
        assert!(!scene.element("IND").unwrap().exiting);
    }

    #[test]
    fn world_is_muted_and_drawn_first() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("IND", 1.0), curve("World", 1.0)]);
        let first = &scene.elements()[0];
        assert_eq!(first.key, "World");
        assert_eq!(first.emphasis, Emphasis::Muted);
        assert_eq!(first.color, palette::NEUTRAL);
        assert!(Emphasis::Muted.stroke_width() < Emphasis::Highlight.stroke_width());
    }

    #[test]
    fn colours_are_stable_across_frames() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("NOR", 1.0)]);
        let before = scene.element("NOR").unwrap().color;
        scene.apply(&[]);
        scene.settle();
        scene.apply(&[curve("NOR", 1.0)]);
        assert_eq!(scene.element("NOR").unwrap().color, before);
    }

    #[test]
    fn legend_is_rebuilt_each_apply() {
        let mut scene = Scene::new(0.3);
        scene.apply(&[curve("World", 1.0), curve("IND", 1.0)]);
        assert_eq!(scene.legend().len(), 2);
        scene.apply(&[curve("NOR", 1.0)]);
        let keys: Vec<_> = scene.legend().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["NOR"]);
    }
}
