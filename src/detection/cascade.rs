//! Viola-Jones face detection over boosted Haar-feature cascades.
//!
//! Cascades are read from the OpenCV XML storage format, e.g. the stock
//! `haarcascade_frontalface_default.xml`. Only upright Haar features with
//! boosted decision-tree stages are supported.

use std::path::Path;
use std::str::FromStr;

use image::GrayImage;
use roxmltree::{Document, Node};

use crate::detection::grouping::{GROUP_EPS, group_rectangles};
use crate::detection::preprocessing::{self, IntegralImages};
use crate::detection::{DetectionParams, FaceDetector, FaceRegion};
use crate::error::CascadeError;

#[derive(Debug, Clone)]
pub struct HaarCascade {
    window_width: u32,
    window_height: u32,
    stages: Vec<Stage>,
    features: Vec<Feature>,
}

#[derive(Debug, Clone)]
struct Stage {
    threshold: f64,
    classifiers: Vec<WeakClassifier>,
}

/// A small decision tree. Child indices `> 0` point at nodes,
/// indices `<= 0` point at `leaves[-idx]`.
#[derive(Debug, Clone)]
struct WeakClassifier {
    nodes: Vec<TreeNode>,
    leaves: Vec<f64>,
}

#[derive(Debug, Clone)]
struct TreeNode {
    left: i32,
    right: i32,
    feature: usize,
    threshold: f64,
}

#[derive(Debug, Clone)]
struct Feature {
    rects: Vec<WeightedRect>,
}

#[derive(Debug, Clone)]
struct WeightedRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    weight: f64,
}

impl HaarCascade {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CascadeError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| CascadeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cascade = Self::from_xml_str(&xml)?;
        log::info!(
            "loaded cascade {} ({} stages, {} features, {}x{} window)",
            path.display(),
            cascade.stages.len(),
            cascade.features.len(),
            cascade.window_width,
            cascade.window_height
        );
        Ok(cascade)
    }

    pub fn from_xml_str(xml: &str) -> Result<Self, CascadeError> {
        let doc = Document::parse(xml)?;
        let root = doc
            .descendants()
            .find(|n| n.has_tag_name("cascade"))
            .ok_or(CascadeError::MissingElement("cascade"))?;

        let stage_type = text(child(root, "stageType")?);
        if stage_type != "BOOST" {
            return Err(CascadeError::Unsupported {
                kind: "stage type",
                value: stage_type.to_string(),
            });
        }
        let feature_type = text(child(root, "featureType")?);
        if feature_type != "HAAR" {
            return Err(CascadeError::Unsupported {
                kind: "feature type",
                value: feature_type.to_string(),
            });
        }

        let window_width: u32 = parse_value(child(root, "width")?, "width")?;
        let window_height: u32 = parse_value(child(root, "height")?, "height")?;
        if window_width < 3 || window_height < 3 {
            return Err(CascadeError::InvalidValue {
                element: "width",
                value: format!("{window_width}x{window_height}"),
            });
        }

        let features = items(child(root, "features")?)
            .map(parse_feature)
            .collect::<Result<Vec<_>, _>>()?;
        let stages = items(child(root, "stages")?)
            .map(parse_stage)
            .collect::<Result<Vec<_>, _>>()?;

        let cascade = Self {
            window_width,
            window_height,
            stages,
            features,
        };
        cascade.validate()?;
        Ok(cascade)
    }

    /// Base detection window size `(width, height)`.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn validate(&self) -> Result<(), CascadeError> {
        for stage in &self.stages {
            for classifier in &stage.classifiers {
                let node_count = classifier.nodes.len() as i32;
                let leaf_count = classifier.leaves.len() as i32;
                for node in &classifier.nodes {
                    if node.feature >= self.features.len() {
                        return Err(CascadeError::FeatureIndex {
                            index: node.feature,
                            count: self.features.len(),
                        });
                    }
                    for child in [node.left, node.right] {
                        let valid = if child > 0 { child < node_count } else { -child < leaf_count };
                        if !valid {
                            return Err(CascadeError::InvalidValue {
                                element: "internalNodes",
                                value: child.to_string(),
                            });
                        }
                    }
                }
            }
        }
        for feature in &self.features {
            for r in &feature.rects {
                if r.x + r.width > self.window_width || r.y + r.height > self.window_height {
                    return Err(CascadeError::InvalidValue {
                        element: "rects",
                        value: format!("{} {} {} {}", r.x, r.y, r.width, r.height),
                    });
                }
            }
        }
        Ok(())
    }

    /// Raw positive windows, in `gray`'s coordinates, before grouping.
    pub fn scan(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceRegion> {
        let (img_w, img_h) = gray.dimensions();
        let (min_w, min_h) = params.min_size;
        let mut candidates = Vec::new();

        if !(params.scale_factor > 1.0) {
            log::warn!("scale factor {} does not grow the window, skipping scan", params.scale_factor);
            return candidates;
        }

        let mut factor = 1.0f64;
        loop {
            let scaled_w = (img_w as f64 / factor).round() as u32;
            let scaled_h = (img_h as f64 / factor).round() as u32;
            if scaled_w < self.window_width || scaled_h < self.window_height {
                break;
            }

            let window_w = (self.window_width as f64 * factor).round() as u32;
            let window_h = (self.window_height as f64 * factor).round() as u32;
            if window_w >= min_w && window_h >= min_h {
                let scaled = preprocessing::resize(gray, scaled_w, scaled_h);
                let tables = IntegralImages::new(&scaled);
                let step = if factor > 2.0 { 1 } else { 2 };

                for y in (0..=scaled_h - self.window_height).step_by(step) {
                    for x in (0..=scaled_w - self.window_width).step_by(step) {
                        if self.accepts(&tables, x, y) {
                            candidates.push(FaceRegion::new(
                                (x as f64 * factor).round() as u32,
                                (y as f64 * factor).round() as u32,
                                window_w,
                                window_h,
                            ));
                        }
                    }
                }
            }

            factor *= params.scale_factor;
        }

        candidates
    }

    /// Run every stage on the window whose top-left corner is `(x, y)`.
    fn accepts(&self, tables: &IntegralImages, x: u32, y: u32) -> bool {
        let inv_norm = self.variance_norm(tables, x, y).recip();

        self.stages.iter().all(|stage| {
            let score: f64 = stage
                .classifiers
                .iter()
                .map(|c| self.classify(c, tables, x, y, inv_norm))
                .sum();
            score >= stage.threshold
        })
    }

    fn classify(&self, classifier: &WeakClassifier, tables: &IntegralImages, x: u32, y: u32, inv_norm: f64) -> f64 {
        let mut idx = 0i32;
        loop {
            let node = &classifier.nodes[idx as usize];
            let value = self.feature_value(node.feature, tables, x, y) * inv_norm;
            idx = if value < node.threshold { node.left } else { node.right };
            if idx <= 0 {
                return classifier.leaves[(-idx) as usize];
            }
        }
    }

    fn feature_value(&self, feature: usize, tables: &IntegralImages, x: u32, y: u32) -> f64 {
        self.features[feature]
            .rects
            .iter()
            .map(|r| r.weight * tables.sum(x + r.x, y + r.y, r.width, r.height) as f64)
            .sum()
    }

    /// Standard deviation scaled by area over the window inset by one pixel.
    fn variance_norm(&self, tables: &IntegralImages, x: u32, y: u32) -> f64 {
        let (w, h) = (self.window_width - 2, self.window_height - 2);
        let area = (w * h) as f64;
        let sum = tables.sum(x + 1, y + 1, w, h) as f64;
        let squared = tables.squared_sum(x + 1, y + 1, w, h) as f64;
        let nf = area * squared - sum * sum;
        if nf > 0.0 { nf.sqrt() } else { 1.0 }
    }
}

impl FaceDetector for HaarCascade {
    fn detect_multi_scale(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceRegion> {
        let candidates = self.scan(gray, params);
        let faces = group_rectangles(&candidates, params.min_neighbors, GROUP_EPS);
        log::debug!("{} candidate windows grouped into {} faces", candidates.len(), faces.len());
        faces
    }
}

fn parse_stage(node: Node) -> Result<Stage, CascadeError> {
    let threshold = parse_value(child(node, "stageThreshold")?, "stageThreshold")?;
    let classifiers = items(child(node, "weakClassifiers")?)
        .map(parse_weak_classifier)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stage {
        threshold,
        classifiers,
    })
}

fn parse_weak_classifier(node: Node) -> Result<WeakClassifier, CascadeError> {
    let raw_nodes = text(child(node, "internalNodes")?);
    let fields: Vec<&str> = raw_nodes.split_whitespace().collect();
    if fields.is_empty() || fields.len() % 4 != 0 {
        return Err(CascadeError::InvalidValue {
            element: "internalNodes",
            value: raw_nodes.to_string(),
        });
    }

    let nodes = fields
        .chunks_exact(4)
        .map(|f| {
            Ok(TreeNode {
                left: parse_field(f[0], "internalNodes")?,
                right: parse_field(f[1], "internalNodes")?,
                feature: parse_field(f[2], "internalNodes")?,
                threshold: parse_field(f[3], "internalNodes")?,
            })
        })
        .collect::<Result<Vec<_>, CascadeError>>()?;

    let leaves = text(child(node, "leafValues")?)
        .split_whitespace()
        .map(|v| parse_field(v, "leafValues"))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(WeakClassifier { nodes, leaves })
}

fn parse_feature(node: Node) -> Result<Feature, CascadeError> {
    if let Some(tilted) = node.children().find(|c| c.has_tag_name("tilted")) {
        if text(tilted) != "0" {
            return Err(CascadeError::Unsupported {
                kind: "feature",
                value: "tilted".to_string(),
            });
        }
    }

    let rects = items(child(node, "rects")?)
        .map(|r| {
            let raw = text(r);
            let f: Vec<&str> = raw.split_whitespace().collect();
            if f.len() != 5 {
                return Err(CascadeError::InvalidValue {
                    element: "rects",
                    value: raw.to_string(),
                });
            }
            Ok(WeightedRect {
                x: parse_field(f[0], "rects")?,
                y: parse_field(f[1], "rects")?,
                width: parse_field(f[2], "rects")?,
                height: parse_field(f[3], "rects")?,
                weight: parse_field(f[4], "rects")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Feature { rects })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Result<Node<'a, 'input>, CascadeError> {
    node.children()
        .find(|c| c.has_tag_name(name))
        .ok_or(CascadeError::MissingElement(name))
}

/// Element children, i.e. the `<_>` entries of an OpenCV sequence.
fn items<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| c.is_element())
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}

fn parse_value<T: FromStr>(node: Node, element: &'static str) -> Result<T, CascadeError> {
    parse_field(text(node), element)
}

fn parse_field<T: FromStr>(raw: &str, element: &'static str) -> Result<T, CascadeError> {
    raw.parse().map_err(|_| CascadeError::InvalidValue {
        element,
        value: raw.to_string(),
    })
}
