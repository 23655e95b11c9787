mod forces;
mod quadtree;

use eframe::egui::{Pos2, Vec2, pos2};
use log::{debug, trace};

use crate::graph::{GraphModel, Pin};
use forces::{Jiggle, ManyBody, Spring, accumulate_many_body, apply_centering, apply_springs};
use quadtree::Cell;

pub trait TickObserver {
    fn on_tick(&mut self, model: &GraphModel);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub charge: f32,
    pub link_distance: f32,
    /// Spring stiffness. `None` derives it per link as
    /// `1 / min(degree(source), degree(target))`.
    pub link_stiffness: Option<f32>,
    pub center: Pos2,
    pub theta: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
}

impl ForceConfig {
    pub fn centered_on(width: f32, height: f32) -> Self {
        Self {
            center: pos2(width * 0.5, height * 0.5),
            ..Self::default()
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            charge: -300.0,
            link_distance: 100.0,
            link_stiffness: None,
            center: Pos2::ZERO,
            theta: 0.9,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
        }
    }
}

pub struct ForceSimulation {
    config: ForceConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    springs: Vec<Spring>,
    jiggle: Jiggle,
    positions: Vec<Pos2>,
}

impl ForceSimulation {
    pub fn new(config: ForceConfig, model: &GraphModel) -> Self {
        Self {
            springs: build_springs(model, config.link_stiffness),
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            jiggle: Jiggle::new(),
            positions: Vec::with_capacity(model.node_count()),
        }
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// Replaces the force parameters; spring constants are re-derived.
    pub fn set_config(&mut self, config: ForceConfig, model: &GraphModel) {
        self.springs = build_springs(model, config.link_stiffness);
        self.config = config;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Keeps the simulation warm by decaying toward `alpha_target` instead of zero.
    pub fn restart(&mut self, alpha_target: f32) {
        debug!("simulation restart, alpha target {alpha_target:.3}");
        self.alpha_target = alpha_target.clamp(0.0, 1.0);
        self.running = true;
    }

    pub fn cool(&mut self) {
        debug!("simulation cooling from alpha {:.3}", self.alpha);
        self.alpha_target = 0.0;
    }

    /// Raises warmth to at least `alpha`, used after the forces change.
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.running = true;
    }

    /// Returns whether another step should be scheduled. Calling it after the
    /// simulation has stopped does nothing.
    pub fn step(&mut self, model: &mut GraphModel, observer: &mut impl TickObserver) -> bool {
        if !self.running {
            return false;
        }

        self.tick(model);
        observer.on_tick(model);

        if self.alpha < self.config.alpha_min {
            debug!("simulation settled");
            self.running = false;
        }
        self.running
    }

    pub fn tick(&mut self, model: &mut GraphModel) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        trace!("tick alpha {:.4}", self.alpha);

        // Forces must see where pinned nodes are now, not where they were.
        for node in model.nodes_mut() {
            if let Some(position) = node.fixed_position() {
                node.position = position;
                node.velocity = Vec2::ZERO;
            }
        }

        let alpha = self.alpha;
        apply_springs(
            model.nodes_mut(),
            &self.springs,
            self.config.link_distance,
            alpha,
            &mut self.jiggle,
        );
        self.apply_repulsion(model, alpha);
        apply_centering(model.nodes_mut(), self.config.center);

        let retained = 1.0 - self.config.velocity_decay;
        for node in model.nodes_mut() {
            match node.pin {
                Pin::Pinned(position) => {
                    node.position = position;
                    node.velocity = Vec2::ZERO;
                }
                Pin::Free => {
                    node.velocity *= retained;
                    node.position += node.velocity;
                }
            }
        }
    }

    fn apply_repulsion(&mut self, model: &mut GraphModel, alpha: f32) {
        if self.config.charge == 0.0 || model.node_count() < 2 {
            return;
        }

        self.positions.clear();
        self.positions
            .extend(model.nodes().iter().map(|node| node.position));
        let Some(tree) = Cell::build(&self.positions) else {
            return;
        };

        let params = ManyBody {
            strength: self.config.charge * alpha,
            theta: self.config.theta,
        };
        for (index, node) in model.nodes_mut().iter_mut().enumerate() {
            accumulate_many_body(
                &tree,
                index,
                &self.positions,
                params,
                &mut self.jiggle,
                &mut node.velocity,
            );
        }
    }
}

fn build_springs(model: &GraphModel, stiffness: Option<f32>) -> Vec<Spring> {
    let degrees = model.degrees();
    model
        .links()
        .iter()
        .map(|link| {
            let source_degree = degrees[link.source] as f32;
            let target_degree = degrees[link.target] as f32;
            Spring {
                source: link.source,
                target: link.target,
                stiffness: stiffness
                    .unwrap_or_else(|| 1.0 / source_degree.min(target_degree))
                    .max(0.0),
                bias: source_degree / (source_degree + target_degree),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphData, LinkRecord, NodeRecord};

    struct CountingObserver {
        ticks: usize,
        last_positions: Vec<Pos2>,
    }

    impl TickObserver for CountingObserver {
        fn on_tick(&mut self, model: &GraphModel) {
            self.ticks += 1;
            self.last_positions = model.nodes().iter().map(|node| node.position).collect();
        }
    }

    fn observer() -> CountingObserver {
        CountingObserver {
            ticks: 0,
            last_positions: Vec::new(),
        }
    }

    fn model(ids: &[&str], links: &[(&str, &str)], config: &ForceConfig) -> GraphModel {
        let data = GraphData {
            nodes: ids
                .iter()
                .map(|id| NodeRecord {
                    id: (*id).to_owned(),
                    description: String::new(),
                })
                .collect(),
            links: links
                .iter()
                .map(|(source, target)| LinkRecord {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                    relationship: None,
                })
                .collect(),
        };
        GraphModel::from_data(data, config.center).unwrap()
    }

    fn run_to_rest(
        engine: &mut ForceSimulation,
        model: &mut GraphModel,
        observer: &mut impl TickObserver,
    ) {
        for _ in 0..2_000 {
            if !engine.step(model, observer) {
                break;
            }
        }
    }

    #[test]
    fn default_cooling_matches_three_hundred_ticks() {
        let config = ForceConfig::default();
        let mut model = model(&["A", "B"], &[("A", "B")], &config);
        let mut engine = ForceSimulation::new(config, &model);
        let mut observer = observer();

        run_to_rest(&mut engine, &mut model, &mut observer);

        assert!(!engine.is_running());
        assert!(engine.alpha() < config.alpha_min);
        assert!((299..=302).contains(&observer.ticks), "ticks {}", observer.ticks);
        assert!(!engine.step(&mut model, &mut observer));
    }

    #[test]
    fn linked_pair_settles_near_rest_distance() {
        let config = ForceConfig::centered_on(960.0, 600.0);
        let mut model = model(&["A", "B"], &[("A", "B")], &config);
        let mut engine = ForceSimulation::new(config, &model);
        let mut observer = observer();

        run_to_rest(&mut engine, &mut model, &mut observer);

        let a = model.nodes()[0].position;
        let b = model.nodes()[1].position;
        let separation = a.distance(b);
        assert!(
            (80.0..=130.0).contains(&separation),
            "separation {separation}"
        );

        let centroid = pos2((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        assert!(centroid.distance(config.center) < 1.0);
        assert_eq!(observer.last_positions, vec![a, b]);
    }

    #[test]
    fn pinned_node_never_moves() {
        let config = ForceConfig::centered_on(400.0, 400.0);
        let mut model = model(&["A", "B", "C"], &[("A", "B"), ("B", "C")], &config);
        let pinned_at = pos2(20.0, 30.0);
        let node = model.node_mut(1).unwrap();
        node.pin = Pin::Pinned(pinned_at);
        node.position = pinned_at;

        let mut engine = ForceSimulation::new(config, &model);
        let mut observer = observer();
        for _ in 0..50 {
            engine.step(&mut model, &mut observer);
            assert_eq!(model.nodes()[1].position, pinned_at);
            assert_eq!(model.nodes()[1].velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn pinned_anchor_pulls_its_neighbour() {
        let config = ForceConfig::centered_on(400.0, 400.0);
        let mut model = model(&["A", "B"], &[("A", "B")], &config);
        let anchor = pos2(-100.0, 200.0);
        model.node_mut(0).unwrap().pin = Pin::Pinned(anchor);
        model.node_mut(0).unwrap().position = anchor;
        model.node_mut(1).unwrap().position = pos2(300.0, 200.0);

        let mut engine = ForceSimulation::new(config, &model);
        engine.tick(&mut model);

        let pull = model.nodes()[1].velocity;
        assert!(pull.x < 0.0, "velocity {pull:?}");
        assert_eq!(model.nodes()[0].position, anchor);
    }

    #[test]
    fn moved_pin_takes_effect_on_the_next_tick() {
        let config = ForceConfig {
            charge: 0.0,
            ..ForceConfig::centered_on(400.0, 400.0)
        };
        let mut model = model(&["A", "B"], &[("A", "B")], &config);
        model.node_mut(0).unwrap().position = pos2(200.0, 200.0);
        model.node_mut(1).unwrap().position = pos2(300.0, 200.0);
        let mut engine = ForceSimulation::new(config, &model);

        // The pin jumps far to the left while the stored position lags behind.
        let pointer = pos2(-400.0, 200.0);
        model.node_mut(0).unwrap().pin = Pin::Pinned(pointer);
        engine.tick(&mut model);

        assert_eq!(model.nodes()[0].position, pointer);
        let pull = model.nodes()[1].velocity;
        assert!(pull.x < 0.0, "velocity {pull:?}");
    }

    #[test]
    fn restart_keeps_simulation_warm_until_cooled() {
        let config = ForceConfig::default();
        let mut model = model(&["A", "B"], &[("A", "B")], &config);
        let mut engine = ForceSimulation::new(config, &model);
        let mut observer = observer();
        run_to_rest(&mut engine, &mut model, &mut observer);
        assert!(!engine.is_running());

        engine.restart(0.3);
        for _ in 0..1_000 {
            assert!(engine.step(&mut model, &mut observer));
        }
        assert!((engine.alpha() - 0.3).abs() < 0.01);

        engine.cool();
        assert_eq!(engine.alpha_target(), 0.0);
        run_to_rest(&mut engine, &mut model, &mut observer);
        assert!(!engine.is_running());
    }

    #[test]
    fn reheat_never_lowers_alpha() {
        let config = ForceConfig::default();
        let model = model(&["A"], &[], &config);
        let mut engine = ForceSimulation::new(config, &model);

        engine.reheat(0.5);
        assert_eq!(engine.alpha(), 1.0);
        assert!(engine.is_running());
    }

    #[test]
    fn explicit_stiffness_overrides_degree_default() {
        let config = ForceConfig::default();
        let model = model(
            &["hub", "a", "b", "c"],
            &[("hub", "a"), ("hub", "b"), ("hub", "c")],
            &config,
        );

        let springs = build_springs(&model, None);
        assert!(springs.iter().all(|spring| spring.stiffness == 1.0));
        assert!(springs.iter().all(|spring| (spring.bias - 0.75).abs() < 1e-6));

        let springs = build_springs(&model, Some(0.0));
        assert!(springs.iter().all(|spring| spring.stiffness == 0.0));
    }

    #[test]
    fn disconnected_nodes_keep_their_distance() {
        let config = ForceConfig::centered_on(300.0, 300.0);
        let mut model = model(&["A", "B", "C"], &[], &config);
        let mut engine = ForceSimulation::new(config, &model);
        let mut observer = observer();
        run_to_rest(&mut engine, &mut model, &mut observer);

        let nodes = model.nodes();
        for (index, node) in nodes.iter().enumerate() {
            for other in &nodes[index + 1..] {
                assert!(node.position.distance(other.position) > 30.0);
            }
        }
    }
}
