//! Element positions along the boom and per-element assembly.
//!
//! Antenna frame: the boom runs along +Z from its base at Z = 0 to its tip,
//! horizontal elements run along X and +Y is up.

use crate::scene::{ExportPart, Scene};
use yagikit_core::{
    Element, ElementSet, ElementType, Error, GeometryError, Label, Placement, Result,
    Rgb,
};
use yagikit_designer::kernel::{self, Solid};
use yagikit_designer::{HousingBuilder, SleeveParams, TerminalBuilder, TerminalMount, WireMount};
use yagikit_settings::{Config, FailurePolicy, SettingsError};

/// Distances of a band's outermost elements from the boom ends.
#[derive(Debug, Clone, PartialEq)]
pub struct BandDistances {
    pub band: String,
    /// First element (reflector) to the boom base
    pub first_from_base: f64,
    /// Last element to the boom tip
    pub last_from_tip: f64,
}

#[derive(Debug, Clone)]
struct Band {
    set: ElementSet,
    element_diameter: f64,
}

/// Positions every element of every band and builds their parts.
#[derive(Debug, Clone)]
pub struct AntennaLayout {
    config: Config,
    pos_base: f64,
    bands: Vec<Band>,
    builder: HousingBuilder,
}

impl AntennaLayout {
    /// Resolve the band tables of `config` into element sets.
    ///
    /// The reference position sits one housing half-depth behind the span
    /// of the longest band, measured back from the boom tip. The first band
    /// sets the element diameter used for that housing.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate().map_err(|e| match e {
            SettingsError::Core(e) => e,
            SettingsError::Geometry(e) => Error::Geometry(e),
            other => Error::other(format!("Invalid configuration: {}", other)),
        })?;

        let reference_diameter = config
            .bands
            .first()
            .map(|b| b.element_diameter)
            .unwrap_or_default();
        let pos_base = config.boom.length
            - config.layout.longest_span
            - (reference_diameter / 2.0 + config.print.element_wall());

        let mut bands = Vec::with_capacity(config.bands.len());
        for band in &config.bands {
            let element_type = ElementType::from_tag(&band.element_type, config.terminal)?;
            let reflector = pos_base + band.reflector_offset;
            let elements = band
                .elements
                .iter()
                .map(|e| Element::new(reflector + e.offset, e.length, e.reversed, e.label.clone()))
                .collect();
            bands.push(Band {
                set: ElementSet {
                    name: band.name.clone(),
                    elements,
                    element_type,
                    polarization: band.polarization,
                    elevation: band.elevation,
                },
                element_diameter: band.element_diameter,
            });
        }
        tracing::debug!(pos_base, bands = bands.len(), "antenna layout");

        Ok(Self {
            config: config.clone(),
            pos_base,
            bands,
            builder: HousingBuilder::new(config.output.arc_segments),
        })
    }

    pub fn pos_base(&self) -> f64 {
        self.pos_base
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.output.failure_policy
    }

    pub fn element_sets(&self) -> impl Iterator<Item = &ElementSet> {
        self.bands.iter().map(|b| &b.set)
    }

    pub fn element_set(&self, name: &str) -> Option<&ElementSet> {
        self.element_sets().find(|s| s.name == name)
    }

    /// Boom radius at `pos` along the boom.
    pub fn radius_at(&self, pos: f64) -> Result<f64> {
        Ok(self.config.boom.radius_at(pos)?)
    }

    fn element_diameter(&self, set: &ElementSet) -> Result<f64> {
        self.bands
            .iter()
            .find(|b| b.set.name == set.name)
            .map(|b| b.element_diameter)
            .ok_or_else(|| Error::other(format!("Unknown element set '{}'", set.name)))
    }

    /// Housing frame to antenna frame.
    pub fn placement(set: &ElementSet, element: &Element) -> Placement {
        Placement::rotation_y(if element.reversed { 180.0 } else { 0.0 })
            .then(Placement::rotation_z(set.polarization.rotation_degrees()))
            .then(Placement::translation(0.0, 0.0, element.position))
    }

    /// Housing frame to print orientation: vertical sets are turned back by
    /// -90° about the boom axis and reversed elements are turned 180° about
    /// the element axis.
    pub fn export_orientation(set: &ElementSet, element: &Element) -> Placement {
        let vertical = set.polarization.is_vertical();
        Self::placement(set, element)
            .rotation_only()
            .then(Placement::rotation_z(if vertical { -90.0 } else { 0.0 }))
            .then(Placement::rotation_x(if element.reversed { 180.0 } else { 0.0 }))
    }

    /// Element rods of `set`, one solid per element, in the antenna frame.
    pub fn elements(&self, set: &ElementSet) -> Result<Vec<Solid>> {
        let radius = self.element_diameter(set)? / 2.0;
        let segments = self.config.output.arc_segments;
        set.elements
            .iter()
            .map(|el| {
                let height = self
                    .config
                    .boom
                    .radius_at(el.position)
                    .map_err(|e| Error::part(&el.label, e))?
                    + set.elevation;
                let rod = kernel::cylinder(
                    nalgebra::Point3::new(-el.length / 2.0, height, 0.0),
                    nalgebra::Point3::new(el.length / 2.0, height, 0.0),
                    radius,
                    segments,
                );
                let placement = Placement::rotation_z(set.polarization.rotation_degrees())
                    .then(Placement::translation(0.0, 0.0, el.position));
                Ok(kernel::place(&rod, &placement))
            })
            .collect()
    }

    fn sleeve(&self, radius: f64, element: &Element) -> SleeveParams {
        let taper = self.config.boom.taper_angle();
        let housing = &self.config.housing;
        SleeveParams {
            base_radius: radius + self.config.print.gap,
            thickness: housing.sleeve_thickness,
            length: housing.sleeve_length,
            angle: housing.sleeve_angle,
            taper_angle: if element.reversed { -taper } else { taper },
        }
    }

    fn terminal_mount(&self, radius: f64, set: &ElementSet) -> TerminalMount {
        let print = &self.config.print;
        let housing = &self.config.housing;
        TerminalMount {
            axis_height: radius + set.elevation,
            wall: print.gap + print.wall(),
            top_extra: housing.top_extra,
            gap: print.gap,
            spacing: housing.terminal_spacing,
            extra_width: housing.terminal_extra_width,
        }
    }

    fn label(&self, element: &Element) -> Label {
        let style = &self.config.label;
        Label::from_code(&element.label, style.font.clone(), style.size, style.depth)
    }

    /// Holder for one element in the housing frame.
    pub fn housing(&self, set: &ElementSet, element: &Element) -> Result<Solid> {
        let element_diameter = self.element_diameter(set)?;
        let build = || -> std::result::Result<Solid, GeometryError> {
            let radius = self.config.boom.radius_at(element.position)?;
            let sleeve = self.sleeve(radius, element);
            let label = Some(self.label(element));
            match set.element_type {
                ElementType::Wire => {
                    let mount = WireMount {
                        element_diameter,
                        axis_height: radius + set.elevation,
                        wall: self.config.print.element_wall(),
                        top_extra: self.config.housing.top_extra,
                    };
                    self.builder
                        .holder_for_wire(&sleeve, self.config.housing.width, &mount, label)
                }
                ElementType::ScrewTerminal(terminal) => {
                    let mount = self.terminal_mount(radius, set);
                    self.builder
                        .holder_for_choco_terminal(&sleeve, &terminal, &mount, label)
                }
            }
        };
        let solid = build().map_err(|e| Error::part(&element.label, e))?;
        tracing::debug!(label = %element.label, "built housing");
        Ok(solid)
    }

    /// Housings of every element of `set`, honoring the failure policy.
    pub fn housings(&self, set: &ElementSet) -> Result<Vec<ExportPart>> {
        let mut parts = Vec::with_capacity(set.elements.len());
        for element in &set.elements {
            match self.housing(set, element) {
                Ok(solid) => parts.push(ExportPart {
                    label: element.label.clone(),
                    solid,
                    placement: Self::placement(set, element),
                    orientation: Self::export_orientation(set, element),
                }),
                Err(e) => self.skip_or_halt(e)?,
            }
        }
        tracing::info!(band = %set.name, built = parts.len(), total = set.elements.len(), "housings");
        Ok(parts)
    }

    /// Terminal bodies of one element in the antenna frame. Wire sets have
    /// none.
    pub fn terminals(&self, set: &ElementSet, element: &Element) -> Result<Vec<Solid>> {
        let ElementType::ScrewTerminal(terminal) = set.element_type else {
            return Ok(Vec::new());
        };
        let radius = self
            .config
            .boom
            .radius_at(element.position)
            .map_err(|e| Error::part(&element.label, e))?;
        let body = TerminalBuilder::new(terminal, self.config.output.arc_segments)
            .body(true)
            .map_err(|e| Error::part(&element.label, e))?;
        let to_antenna = Self::placement(set, element);
        Ok(self
            .terminal_mount(radius, set)
            .terminal_placements(&terminal)
            .into_iter()
            .map(|p| kernel::place(&body, &p.then(to_antenna.clone())))
            .collect())
    }

    /// Tapered boom from base to tip.
    pub fn boom(&self) -> Solid {
        let boom = &self.config.boom;
        kernel::frustum(
            nalgebra::Point3::origin(),
            nalgebra::Point3::new(0.0, 0.0, boom.length),
            boom.base_radius(),
            boom.tip_radius(),
            self.config.output.arc_segments,
        )
    }

    pub fn distances(&self) -> Vec<BandDistances> {
        self.element_sets()
            .filter_map(|set| {
                let first = set.elements.first()?;
                let last = set.elements.last()?;
                Some(BandDistances {
                    band: set.name.clone(),
                    first_from_base: first.position,
                    last_from_tip: self.config.boom.length - last.position,
                })
            })
            .collect()
    }

    fn skip_or_halt(&self, error: Error) -> Result<()> {
        match self.failure_policy() {
            FailurePolicy::Halt => Err(error),
            FailurePolicy::Skip => {
                tracing::warn!(label = error.label().unwrap_or("?"), "skipping part: {}", error);
                Ok(())
            }
        }
    }

    /// Build the full scene: boom, element rods, housings and terminals of
    /// every band, plus the housings to export.
    pub fn assemble(&self) -> Result<Scene> {
        for d in self.distances() {
            tracing::info!(
                band = %d.band,
                "Distance of the last element from the boom tip: {:.1}, of the first element from the boom base: {:.1}",
                d.last_from_tip,
                d.first_from_base
            );
        }

        let mut scene = Scene::new();
        scene.add("rod", Rgb::ROD, self.boom());

        for set in self.element_sets() {
            let rods = self.elements(set)?;
            scene.add(format!("{} elements", set.name), Rgb::ELEMENT, kernel::compound(&rods));

            let parts = self.housings(set)?;
            let placed: Vec<Solid> = parts
                .iter()
                .map(|p| kernel::place(&p.solid, &p.placement))
                .collect();
            if !placed.is_empty() {
                scene.add(format!("{} housing", set.name), Rgb::HOUSING, kernel::compound(&placed));
            }

            if matches!(set.element_type, ElementType::ScrewTerminal(_)) {
                let mut bodies = Vec::new();
                for element in &set.elements {
                    match self.terminals(set, element) {
                        Ok(placed) => bodies.extend(placed),
                        Err(e) => self.skip_or_halt(e)?,
                    }
                }
                if !bodies.is_empty() {
                    scene.add(format!("{} terminals", set.name), Rgb::TERMINAL, kernel::compound(&bodies));
                }
            }
            scene.add_parts(parts);
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> AntennaLayout {
        AntennaLayout::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_reference_position() {
        let expected = 1130.0 - 1016.0 - (3.175 / 2.0 + 0.1 + 0.8);
        assert!((layout().pos_base() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_band_positions() {
        let layout = layout();
        let set = layout.element_set("2m").unwrap();
        let refl = layout.pos_base() - 30.0;
        let positions: Vec<f64> = set.elements.iter().map(|e| e.position).collect();
        assert!((positions[0] - refl).abs() < 1e-9);
        assert!((positions[1] - (refl + 610.0)).abs() < 1e-9);
        assert!((positions[2] - (refl + 910.0)).abs() < 1e-9);
        assert_eq!(layout.element_set("70cm").unwrap().elements.len(), 8);
    }

    #[test]
    fn test_distances() {
        let layout = layout();
        let d = &layout.distances()[0];
        assert_eq!(d.band, "2m");
        assert!((d.first_from_base - (layout.pos_base() - 30.0)).abs() < 1e-9);
        assert!((d.last_from_tip - (1130.0 - layout.pos_base() - 880.0)).abs() < 1e-9);
    }

    #[test]
    fn test_export_orientation_undoes_polarization() {
        let layout = layout();
        let set = layout.element_set("70cm").unwrap();
        let el = &set.elements[1];
        assert!(!el.reversed);
        let o = AntennaLayout::export_orientation(set, el);
        let up = o.apply_vector(nalgebra::Vector3::y());
        assert!((up - nalgebra::Vector3::y()).norm() < 1e-9);

        // Reversed: both half turns cancel and the sleeve axis is back on +Z.
        let rev = &set.elements[0];
        assert!(rev.reversed);
        let o = AntennaLayout::export_orientation(set, rev);
        let axis = o.apply_vector(nalgebra::Vector3::z());
        assert!((axis - nalgebra::Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn test_unknown_element_type_keeps_its_kind() {
        let mut config = Config::default();
        config.bands[1].element_type = "dipole".to_string();
        match AntennaLayout::new(&config) {
            Err(Error::UnknownElementType(tag)) => assert_eq!(tag, "dipole"),
            other => panic!("expected an unknown element type, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_radius_outside_boom_is_rejected() {
        assert!(layout().radius_at(-1.0).is_err());
        assert!(layout().radius_at(1131.0).is_err());
    }
}
