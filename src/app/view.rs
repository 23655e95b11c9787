use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use log::{debug, info};

use crate::catalog::DatasetId;
use crate::config::{Preset, ViewerConfig};
use crate::graph::GraphModel;
use crate::inspect::Inspector;
use crate::interaction::InteractionController;
use crate::scene::Scene;
use crate::simulation::{ForceConfig, ForceSimulation};

use super::ViewModel;

/// Warmth injected when the force parameters change under a live layout.
const REHEAT_ALPHA: f32 = 0.5;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn new(
        dataset: DatasetId,
        model: GraphModel,
        preset: Preset,
        config: &ViewerConfig,
    ) -> Self {
        let forces = preset.force_config(config.canvas);
        let engine = ForceSimulation::new(forces, &model);
        let scene = Scene::build(&model, preset.scene_style(config.node_radius, config.arrow_width));
        info!(
            "showing {dataset}: {} nodes, {} links",
            model.node_count(),
            model.link_count()
        );

        Self {
            dataset,
            preset,
            model,
            engine,
            scene,
            interaction: InteractionController::default(),
            inspector: Inspector::default(),
            forces,
            search: String::new(),
            search_matches: HashSet::new(),
        }
    }

    pub(in crate::app) fn apply_preset(&mut self, preset: Preset, config: &ViewerConfig) {
        debug!("applying preset {}", preset.label());
        self.preset = preset;
        self.scene = Scene::build(
            &self.model,
            preset.scene_style(config.node_radius, config.arrow_width),
        );
        self.forces = ForceConfig {
            link_stiffness: self.engine.config().link_stiffness,
            ..preset.force_config(config.canvas)
        };
        self.apply_forces();
    }

    pub(in crate::app) fn apply_forces(&mut self) {
        self.engine.set_config(self.forces, &self.model);
        self.engine.reheat(REHEAT_ALPHA);
    }

    pub(in crate::app) fn advance(&mut self) -> bool {
        self.engine.step(&mut self.model, &mut self.scene)
    }

    pub(in crate::app) fn refresh_search(&mut self) {
        self.search_matches.clear();
        let query = self.search.trim();
        if query.is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();
        self.search_matches.extend(
            self.model
                .nodes()
                .iter()
                .enumerate()
                .filter(|(_, node)| fuzzy_match_score(&matcher, &node.id, query).is_some())
                .map(|(index, _)| index),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::Args;
    use crate::graph::{GraphData, LinkRecord, NodeRecord};

    fn config() -> ViewerConfig {
        ViewerConfig::from_args(&Args::try_parse_from(["relmap"]).unwrap()).unwrap()
    }

    fn view() -> ViewModel {
        let config = config();
        let node = |id: &str| NodeRecord {
            id: id.to_owned(),
            description: String::new(),
        };
        let data = GraphData {
            nodes: vec![node("Sherlock Holmes"), node("John Watson"), node("Irene Adler")],
            links: vec![LinkRecord {
                source: "Sherlock Holmes".to_owned(),
                target: "John Watson".to_owned(),
                relationship: Some("flatmate".to_owned()),
            }],
        };
        let model = GraphModel::from_data(data, (config.canvas * 0.5).to_pos2()).unwrap();
        ViewModel::new(
            DatasetId::new("module1", "Characters"),
            model,
            Preset::Annotated,
            &config,
        )
    }

    #[test]
    fn search_highlights_fuzzy_matches() {
        let mut view = view();
        view.search = "wtsn".to_owned();
        view.refresh_search();
        assert_eq!(view.search_matches, HashSet::from([1]));

        view.search = "  ".to_owned();
        view.refresh_search();
        assert!(view.search_matches.is_empty());
    }

    #[test]
    fn preset_switch_restyles_and_rewarms() {
        let config = config();
        let mut view = view();
        while view.advance() {}
        assert!(!view.engine.is_running());

        view.apply_preset(Preset::Plain, &config);
        assert!(view.engine.is_running());
        assert_eq!(view.engine.alpha(), REHEAT_ALPHA);
        assert_eq!(view.engine.config().link_distance, 150.0);
        assert!(view.scene.links()[0].arrow.is_none());
    }

    #[test]
    fn stiffness_override_survives_preset_switch() {
        let config = config();
        let mut view = view();
        view.forces.link_stiffness = Some(0.25);
        view.apply_forces();

        view.apply_preset(Preset::Compact, &config);
        assert_eq!(view.engine.config().link_stiffness, Some(0.25));
        assert_eq!(view.engine.config().charge, -120.0);
    }
}
