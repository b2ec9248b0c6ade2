// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::seq::IndexedRandom;
use rand::Rng;
use relit_core::math::{LinearRgba, Vec3, PI};
use relit_core::sampling::{uniform, ClusterSpread, PointSampler, SceneRng, SeedPlan, ShellParams, UpAxis};
use relit_core::{
    AreaEmitter, EnvironmentMap, LightCategory, LightSpec, PointEmitter, SamplingError, Split,
};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while planning a scene's lighting.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("{0} colored environment variant(s) requested but the environment map list is empty")]
    NoEnvironmentMaps(usize),
    #[error("multi point light variants need at least one light per variant")]
    NoLightsPerVariant,
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

/// Number of variants rendered per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantCounts {
    pub white_env: usize,
    pub white_pl: usize,
    pub rgb_pl: usize,
    pub multi_pl: usize,
    pub env_colored: usize,
    pub area: usize,
}

impl Default for VariantCounts {
    fn default() -> Self {
        Self {
            white_env: 1,
            white_pl: 3,
            rgb_pl: 3,
            multi_pl: 2,
            env_colored: 3,
            area: 2,
        }
    }
}

impl VariantCounts {
    pub fn get(&self, category: LightCategory) -> usize {
        match category {
            LightCategory::WhiteEnv => self.white_env,
            LightCategory::WhitePoint => self.white_pl,
            LightCategory::RgbPoint => self.rgb_pl,
            LightCategory::MultiPoint => self.multi_pl,
            LightCategory::EnvColored => self.env_colored,
            LightCategory::Area => self.area,
        }
    }

    pub fn set(&mut self, category: LightCategory, count: usize) {
        let slot = match category {
            LightCategory::WhiteEnv => &mut self.white_env,
            LightCategory::WhitePoint => &mut self.white_pl,
            LightCategory::RgbPoint => &mut self.rgb_pl,
            LightCategory::MultiPoint => &mut self.multi_pl,
            LightCategory::EnvColored => &mut self.env_colored,
            LightCategory::Area => &mut self.area,
        };
        *slot = count;
    }

    pub fn total(&self) -> usize {
        LightCategory::ORDERED.iter().map(|c| self.get(*c)).sum()
    }
}

/// Position shell and power range of a point light category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecipe {
    pub shell: ShellParams,
    pub power: (f32, f32),
    /// Chance that a light is pure white instead of a random tint.
    pub white_probability: f64,
    /// Per-channel range of the random tint.
    pub tint: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaRecipe {
    pub shell: ShellParams,
    pub power: (f32, f32),
    pub size: (f32, f32),
    pub white_probability: f64,
    pub tint: (f32, f32),
}

/// Sampling ranges for every light category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRecipes {
    pub white_pl: PointRecipe,
    pub rgb_pl: PointRecipe,
    pub multi_pl: PointRecipe,
    pub area: AreaRecipe,
    pub env_strength: f32,
}

impl Default for LightRecipes {
    fn default() -> Self {
        Self {
            white_pl: PointRecipe {
                shell: ShellParams::new(3.5, 5.0).with_polar(0.0, 85.0),
                power: (500.0, 1500.0),
                white_probability: 1.0,
                tint: (1.0, 1.0),
            },
            rgb_pl: PointRecipe {
                shell: ShellParams::new(4.0, 5.0).with_polar(0.0, 60.0),
                power: (900.0, 1500.0),
                white_probability: 0.0,
                tint: (0.0, 1.0),
            },
            multi_pl: PointRecipe {
                shell: ShellParams::new(3.0, 5.0).with_polar(0.0, 85.0),
                power: (500.0, 1500.0),
                white_probability: 0.5,
                tint: (0.4, 1.0),
            },
            area: AreaRecipe {
                shell: ShellParams::new(3.0, 6.0).with_polar(0.0, 85.0),
                power: (700.0, 1500.0),
                size: (5.0, 10.0),
                white_probability: 0.75,
                tint: (0.4, 1.0),
            },
            env_strength: 1.0,
        }
    }
}

impl LightRecipes {
    fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.white_pl.shell.up_axis = up_axis;
        self.rgb_pl.shell.up_axis = up_axis;
        self.multi_pl.shell.up_axis = up_axis;
        self.area.shell.up_axis = up_axis;
        self
    }
}

/// How the lights of one multi point variant are spread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MultiLayout {
    /// Every light drawn independently over the whole shell.
    #[default]
    Scattered,
    /// The lights of a variant gather around one random center.
    Clustered(ClusterSpread),
}

/// Everything needed to plan the lighting of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub counts: VariantCounts,
    /// Lights per multi point variant.
    pub max_pl_num: usize,
    pub white_env_dir: PathBuf,
    pub env_dir: PathBuf,
    /// Environment map names, resolved to `{env_dir}/{name}_8k.exr`.
    pub env_maps: Vec<String>,
    pub multi_layout: MultiLayout,
    pub up_axis: UpAxis,
    pub recipes: LightRecipes,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            counts: VariantCounts::default(),
            max_pl_num: 3,
            white_env_dir: PathBuf::from("env_maps"),
            env_dir: PathBuf::from("env_maps"),
            env_maps: Vec::new(),
            multi_layout: MultiLayout::Scattered,
            up_axis: UpAxis::Z,
            recipes: LightRecipes::default(),
        }
    }
}

/// Identity of one lighting variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub category: LightCategory,
    pub index: usize,
    /// Seed of the category stream the variant was drawn from.
    pub seed: Option<u64>,
    /// Camera sets rendered under this variant, in order.
    pub splits: Vec<Split>,
}

impl VariantDescriptor {
    /// Output directory name, e.g. `white_pl_2`.
    pub fn name(&self) -> String {
        self.category.variant_name(self.index)
    }
}

/// A variant with its drawn light parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVariant {
    pub descriptor: VariantDescriptor,
    pub light: LightSpec,
}

/// The ordered lighting variants of one scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantPlan {
    variants: Vec<PlannedVariant>,
}

impl VariantPlan {
    /// Plans every variant of scene `scene_index`.
    ///
    /// Each category draws from its own stream: all positions first, then
    /// per-variant powers, sizes and colors. Categories with a zero count are
    /// left out and consume nothing.
    pub fn build(config: &LightingConfig, seeds: &SeedPlan, scene_index: u64) -> Result<Self, PlanError> {
        let recipes = config.recipes.with_up_axis(config.up_axis);
        let mut variants = Vec::with_capacity(config.counts.total());
        for category in LightCategory::ORDERED {
            let count = config.counts.get(category);
            if count == 0 {
                continue;
            }
            let stream = category.seed_stream();
            let seed = seeds.seed_for(scene_index, stream);
            let mut sampler = PointSampler::new(seeds.rng_for(scene_index, stream));
            let lights = match category {
                LightCategory::WhiteEnv => {
                    let path = config.white_env_dir.join("white_env_8k.exr");
                    (0..count)
                        .map(|_| {
                            LightSpec::WhiteEnv(environment("white_env", path.clone(), recipes.env_strength, sampler.rng_mut()))
                        })
                        .collect()
                }
                LightCategory::WhitePoint => {
                    plan_points(&mut sampler, count, &recipes.white_pl)?.into_iter().map(LightSpec::PointWhite).collect()
                }
                LightCategory::RgbPoint => {
                    plan_points(&mut sampler, count, &recipes.rgb_pl)?.into_iter().map(LightSpec::PointRgb).collect()
                }
                LightCategory::MultiPoint => plan_multi(&mut sampler, count, config, &recipes.multi_pl)?,
                LightCategory::EnvColored => {
                    if config.env_maps.is_empty() {
                        return Err(PlanError::NoEnvironmentMaps(count));
                    }
                    let rng = sampler.rng_mut();
                    let mut lights = Vec::with_capacity(count);
                    for _ in 0..count {
                        let name = config.env_maps.choose(&mut *rng).cloned().unwrap_or_default();
                        let path = config.env_dir.join(format!("{name}_8k.exr"));
                        lights.push(LightSpec::EnvColored(environment(&name, path, recipes.env_strength, &mut *rng)));
                    }
                    lights
                }
                LightCategory::Area => plan_area(&mut sampler, count, &recipes.area)?,
            };
            variants.extend(lights.into_iter().enumerate().map(|(index, light)| PlannedVariant {
                descriptor: VariantDescriptor {
                    category,
                    index,
                    seed,
                    splits: Split::ALL.to_vec(),
                },
                light,
            }));
        }
        log::debug!("VariantPlan: scene {scene_index} planned {} variant(s)", variants.len());
        Ok(Self { variants })
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedVariant> {
        self.variants.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &VariantDescriptor> {
        self.variants.iter().map(|v| &v.descriptor)
    }
}

impl IntoIterator for VariantPlan {
    type Item = PlannedVariant;
    type IntoIter = std::vec::IntoIter<PlannedVariant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.into_iter()
    }
}

fn environment(map_id: &str, path: PathBuf, strength: f32, rng: &mut SceneRng) -> EnvironmentMap {
    EnvironmentMap {
        map_id: map_id.to_string(),
        path,
        rotation_euler: Vec3::new(0.0, 0.0, uniform(rng, -PI, PI)),
        strength,
    }
}

fn tint<R: Rng + ?Sized>(rng: &mut R, white_probability: f64, range: (f32, f32)) -> LinearRgba {
    if white_probability >= 1.0 || (white_probability > 0.0 && rng.random_bool(white_probability)) {
        return LinearRgba::WHITE;
    }
    let r = uniform(rng, range.0, range.1);
    let g = uniform(rng, range.0, range.1);
    let b = uniform(rng, range.0, range.1);
    LinearRgba::rgb(r, g, b)
}

fn plan_points(
    sampler: &mut PointSampler,
    count: usize,
    recipe: &PointRecipe,
) -> Result<Vec<PointEmitter>, PlanError> {
    let positions = sampler.sample_shell(count, &recipe.shell)?;
    let rng = sampler.rng_mut();
    Ok(positions
        .into_iter()
        .map(|position| {
            let power = uniform(rng, recipe.power.0, recipe.power.1);
            let color = tint(rng, recipe.white_probability, recipe.tint);
            PointEmitter { position, power, color }
        })
        .collect())
}

fn plan_multi(
    sampler: &mut PointSampler,
    count: usize,
    config: &LightingConfig,
    recipe: &PointRecipe,
) -> Result<Vec<LightSpec>, PlanError> {
    let per_variant = config.max_pl_num;
    if per_variant == 0 {
        return Err(PlanError::NoLightsPerVariant);
    }
    let position_sets: Vec<Vec<Vec3>> = match config.multi_layout {
        MultiLayout::Scattered => sampler
            .sample_shell(count * per_variant, &recipe.shell)?
            .chunks(per_variant)
            .map(<[Vec3]>::to_vec)
            .collect(),
        MultiLayout::Clustered(spread) => (0..count)
            .map(|_| sampler.sample_clustered(per_variant, &recipe.shell, &spread))
            .collect::<Result<_, _>>()?,
    };
    let rng = sampler.rng_mut();
    Ok(position_sets
        .into_iter()
        .map(|positions| {
            let powers: Vec<f32> = positions.iter().map(|_| uniform(rng, recipe.power.0, recipe.power.1)).collect();
            let lights = positions
                .into_iter()
                .zip(powers)
                .map(|(position, power)| PointEmitter {
                    position,
                    power,
                    color: tint(rng, recipe.white_probability, recipe.tint),
                })
                .collect();
            LightSpec::PointMulti(lights)
        })
        .collect())
}

fn plan_area(sampler: &mut PointSampler, count: usize, recipe: &AreaRecipe) -> Result<Vec<LightSpec>, PlanError> {
    let positions = sampler.sample_shell(count, &recipe.shell)?;
    let rng = sampler.rng_mut();
    Ok(positions
        .into_iter()
        .map(|position| {
            let power = uniform(rng, recipe.power.0, recipe.power.1);
            let size = uniform(rng, recipe.size.0, recipe.size.1);
            let color = tint(rng, recipe.white_probability, recipe.tint);
            LightSpec::Area(AreaEmitter {
                position,
                power,
                size,
                color,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relit_core::sampling::SeedStream;

    fn config() -> LightingConfig {
        LightingConfig {
            env_maps: vec!["studio".into(), "forest".into()],
            ..LightingConfig::default()
        }
    }

    #[test]
    fn test_plan_order_and_names() {
        let plan = VariantPlan::build(&config(), &SeedPlan::new(Some(42)), 0).unwrap();
        let names: Vec<String> = plan.descriptors().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "white_env_0", "white_pl_0", "white_pl_1", "white_pl_2", "rgb_pl_0", "rgb_pl_1", "rgb_pl_2",
                "multi_pl_0", "multi_pl_1", "env_0", "env_1", "env_2", "area_0", "area_1",
            ]
        );
        assert_eq!(plan.len(), VariantCounts::default().total());
    }

    #[test]
    fn test_plan_is_deterministic_per_seed() {
        let seeds = SeedPlan::new(Some(7));
        let a = VariantPlan::build(&config(), &seeds, 3).unwrap();
        let b = VariantPlan::build(&config(), &seeds, 3).unwrap();
        assert_eq!(a, b);
        let other = VariantPlan::build(&config(), &seeds, 4).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_categories_use_distinct_streams() {
        let seeds = SeedPlan::new(Some(100));
        let plan = VariantPlan::build(&config(), &seeds, 0).unwrap();
        for d in plan.descriptors() {
            assert_eq!(d.seed, seeds.seed_for(0, d.category.seed_stream()));
        }
        assert_eq!(
            plan.descriptors().find(|d| d.category == LightCategory::WhitePoint).unwrap().seed,
            Some(100 + SeedStream::WhitePointLight.offset())
        );
    }

    #[test]
    fn test_zero_count_does_not_shift_other_categories() {
        let seeds = SeedPlan::new(Some(5));
        let full = VariantPlan::build(&config(), &seeds, 0).unwrap();
        let mut cfg = config();
        cfg.counts.rgb_pl = 0;
        let reduced = VariantPlan::build(&cfg, &seeds, 0).unwrap();
        let area = |plan: &VariantPlan| {
            plan.iter()
                .filter(|v| v.descriptor.category == LightCategory::Area)
                .map(|v| v.light.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(area(&full), area(&reduced));
        assert!(reduced.descriptors().all(|d| d.category != LightCategory::RgbPoint));
    }

    #[test]
    fn test_parameters_respect_recipes() {
        let plan = VariantPlan::build(&config(), &SeedPlan::new(Some(9)), 0).unwrap();
        for variant in plan.iter() {
            match &variant.light {
                LightSpec::PointWhite(p) => {
                    assert!((500.0..=1500.0).contains(&p.power));
                    assert_eq!(p.color, LinearRgba::WHITE);
                    let r = p.position.length();
                    assert!((3.5 - 1e-4..=5.0 + 1e-4).contains(&r));
                    assert!(p.position.z >= -1e-4);
                }
                LightSpec::PointRgb(p) => assert!((900.0..=1500.0).contains(&p.power)),
                LightSpec::PointMulti(lights) => {
                    assert_eq!(lights.len(), 3);
                    for l in lights {
                        let white = l.color == LinearRgba::WHITE;
                        assert!(white || [l.color.r, l.color.g, l.color.b].iter().all(|c| (0.4..=1.0).contains(c)));
                    }
                }
                LightSpec::Area(a) => {
                    assert!((700.0..=1500.0).contains(&a.power));
                    assert!((5.0..=10.0).contains(&a.size));
                }
                LightSpec::WhiteEnv(env) => {
                    assert_eq!(env.path, PathBuf::from("env_maps/white_env_8k.exr"));
                    assert!(env.rotation_euler.z.abs() <= PI);
                }
                LightSpec::EnvColored(env) => {
                    assert!(env.map_id == "studio" || env.map_id == "forest");
                    assert_eq!(env.path, PathBuf::from(format!("env_maps/{}_8k.exr", env.map_id)));
                }
            }
        }
    }

    #[test]
    fn test_clustered_multi_layout() {
        let cfg = LightingConfig {
            multi_layout: MultiLayout::Clustered(ClusterSpread::default()),
            max_pl_num: 4,
            ..config()
        };
        let plan = VariantPlan::build(&cfg, &SeedPlan::new(Some(1)), 0).unwrap();
        let multi = plan.iter().find(|v| v.descriptor.category == LightCategory::MultiPoint).unwrap();
        match &multi.light {
            LightSpec::PointMulti(lights) => assert_eq!(lights.len(), 4),
            other => panic!("unexpected light {other:?}"),
        }
    }

    #[test]
    fn test_missing_env_maps_is_an_error() {
        let err = VariantPlan::build(&LightingConfig::default(), &SeedPlan::new(Some(0)), 0).unwrap_err();
        assert_eq!(err, PlanError::NoEnvironmentMaps(3));
        let mut cfg = LightingConfig::default();
        cfg.counts.env_colored = 0;
        assert!(VariantPlan::build(&cfg, &SeedPlan::new(Some(0)), 0).is_ok());
    }
}
