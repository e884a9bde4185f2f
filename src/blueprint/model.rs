//! Typed blueprint document: entities, wires and the fixed envelope the engine expects.
//!
//! Field names and nesting follow the engine's JSON exactly, which is why some payloads are
//! several single-field structs deep.

use crate::foundation::core::{EntityId, Pole, Position, serialize_number};

/// Format version stamped on every generated blueprint.
pub const BLUEPRINT_VERSION: u64 = 562_949_954_732_035;

/// Item marker of a plain blueprint (as opposed to a book or planner).
pub const BLUEPRINT_ITEM: &str = "blueprint";

/// Virtual signal names used by the generated networks.
pub mod signals {
    /// Wildcard: every signal on the input, one-to-one on the output.
    pub const EACH: &str = "signal-each";
    /// Wildcard: forward every input signal when the condition holds.
    pub const EVERYTHING: &str = "signal-everything";
    /// Lamp red component.
    pub const RED: &str = "signal-red";
    /// Lamp green component.
    pub const GREEN: &str = "signal-green";
    /// Lamp blue component.
    pub const BLUE: &str = "signal-blue";
    /// Default playback clock.
    pub const HEART: &str = "signal-heart";

    /// Letter signal `signal-<letter>` from the data channel pool.
    pub fn letter(letter: &str) -> String {
        format!("signal-{letter}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Virtual,
    Item,
}

/// Reference to a signal channel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignalId {
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub name: String,
}

impl SignalId {
    pub fn virtual_signal(name: impl Into<String>) -> Self {
        Self {
            kind: SignalType::Virtual,
            name: name.into(),
        }
    }
}

/// Decider comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
}

/// Arithmetic combinator operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ArithmeticOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
}

/// Which wire colors a combinator reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Networks {
    pub red: bool,
    pub green: bool,
}

impl Networks {
    pub const RED: Self = Self {
        red: true,
        green: false,
    };
    pub const GREEN: Self = Self {
        red: false,
        green: true,
    };
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    #[serde(serialize_with = "serialize_number")]
    pub r: f64,
    #[serde(serialize_with = "serialize_number")]
    pub g: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(serialize_with = "serialize_number")]
    pub a: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LampControl {
    pub use_colors: bool,
    /// 1 = color from the separate red/green/blue component signals.
    pub color_mode: u8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LampConfig {
    pub control_behavior: LampControl,
    pub color: Color,
    pub always_on: bool,
}

/// One constant-combinator slot.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub name: String,
    pub quality: String,
    pub comparator: Comparator,
    pub count: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    pub index: u32,
    pub filters: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SectionList {
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConstantControl {
    pub sections: SectionList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConstantConfig {
    pub control_behavior: ConstantControl,
}

impl ConstantConfig {
    /// Filters of the first (only) section.
    pub fn filters(&self) -> &[Filter] {
        self.control_behavior
            .sections
            .sections
            .first()
            .map(|s| s.filters.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArithmeticConditions {
    pub first_signal: SignalId,
    pub second_constant: i32,
    pub operation: ArithmeticOp,
    pub output_signal: SignalId,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArithmeticControl {
    pub arithmetic_conditions: ArithmeticConditions,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArithmeticConfig {
    pub control_behavior: ArithmeticControl,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeciderCondition {
    pub first_signal: SignalId,
    pub constant: i32,
    pub comparator: Comparator,
    pub first_signal_networks: Networks,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeciderOutput {
    pub signal: SignalId,
    pub networks: Networks,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeciderConditions {
    pub conditions: Vec<DeciderCondition>,
    pub outputs: Vec<DeciderOutput>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeciderControl {
    pub decider_conditions: DeciderConditions,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeciderConfig {
    pub control_behavior: DeciderControl,
}

impl DeciderConfig {
    /// The single condition generated decider combinators carry.
    pub fn condition(&self) -> Option<&DeciderCondition> {
        self.control_behavior.decider_conditions.conditions.first()
    }
}

/// Entity payload, tagged by prototype name.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "name")]
pub enum EntityKind {
    #[serde(rename = "small-lamp")]
    Lamp(LampConfig),
    #[serde(rename = "constant-combinator")]
    Constant(ConstantConfig),
    #[serde(rename = "arithmetic-combinator")]
    Arithmetic(ArithmeticConfig),
    #[serde(rename = "decider-combinator")]
    Decider(DeciderConfig),
}

impl EntityKind {
    /// Prototype name as written in the document.
    pub fn prototype(&self) -> &'static str {
        match self {
            Self::Lamp(_) => "small-lamp",
            Self::Constant(_) => "constant-combinator",
            Self::Arithmetic(_) => "arithmetic-combinator",
            Self::Decider(_) => "decider-combinator",
        }
    }
}

/// A placed entity.
///
/// Serialized by hand in the engine's key order: `entity_number`, `name`, `position`,
/// `direction`, then the payload fields.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Entity {
    pub entity_number: EntityId,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub position: Position,
    #[serde(default)]
    pub direction: Option<u8>,
}

impl serde::Serialize for Entity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap as _;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("entity_number", &self.entity_number)?;
        map.serialize_entry("name", self.kind.prototype())?;
        map.serialize_entry("position", &self.position)?;
        if let Some(direction) = self.direction {
            map.serialize_entry("direction", &direction)?;
        }
        match &self.kind {
            EntityKind::Lamp(lamp) => {
                map.serialize_entry("control_behavior", &lamp.control_behavior)?;
                map.serialize_entry("color", &lamp.color)?;
                map.serialize_entry("always_on", &lamp.always_on)?;
            }
            EntityKind::Constant(c) => {
                map.serialize_entry("control_behavior", &c.control_behavior)?;
            }
            EntityKind::Arithmetic(a) => {
                map.serialize_entry("control_behavior", &a.control_behavior)?;
            }
            EntityKind::Decider(d) => {
                map.serialize_entry("control_behavior", &d.control_behavior)?;
            }
        }
        map.end()
    }
}

impl Entity {
    /// Color lamp driven by the red/green/blue component signals.
    pub fn lamp(id: EntityId, position: Position) -> Self {
        Self::new(
            id,
            position,
            EntityKind::Lamp(LampConfig {
                control_behavior: LampControl {
                    use_colors: true,
                    color_mode: 1,
                },
                color: Color {
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    a: 1.0,
                },
                always_on: true,
            }),
        )
    }

    /// Constant combinator emitting `(signal, count)` pairs in one section, in order.
    pub fn constant<I>(id: EntityId, position: Position, values: I) -> Self
    where
        I: IntoIterator<Item = (SignalId, i32)>,
    {
        let filters = values
            .into_iter()
            .enumerate()
            .map(|(i, (signal, count))| Filter {
                index: i as u32 + 1,
                kind: signal.kind,
                name: signal.name,
                quality: "normal".to_string(),
                comparator: Comparator::Equal,
                count,
            })
            .collect();
        Self::new(
            id,
            position,
            EntityKind::Constant(ConstantConfig {
                control_behavior: ConstantControl {
                    sections: SectionList {
                        sections: vec![Section { index: 1, filters }],
                    },
                    is_on: None,
                },
            }),
        )
    }

    /// `output = input <op> constant`.
    pub fn arithmetic(
        id: EntityId,
        position: Position,
        input: SignalId,
        operation: ArithmeticOp,
        constant: i32,
        output: SignalId,
    ) -> Self {
        Self::new(
            id,
            position,
            EntityKind::Arithmetic(ArithmeticConfig {
                control_behavior: ArithmeticControl {
                    arithmetic_conditions: ArithmeticConditions {
                        first_signal: input,
                        second_constant: constant,
                        operation,
                        output_signal: output,
                    },
                },
            }),
        )
    }

    /// Gate reading `input` from the green network and forwarding everything onto red.
    pub fn gate(
        id: EntityId,
        position: Position,
        input: SignalId,
        comparator: Comparator,
        constant: i32,
    ) -> Self {
        Self::new(
            id,
            position,
            EntityKind::Decider(DeciderConfig {
                control_behavior: DeciderControl {
                    decider_conditions: DeciderConditions {
                        conditions: vec![DeciderCondition {
                            first_signal: input,
                            constant,
                            comparator,
                            first_signal_networks: Networks::GREEN,
                        }],
                        outputs: vec![DeciderOutput {
                            signal: SignalId::virtual_signal(signals::EVERYTHING),
                            networks: Networks::RED,
                        }],
                    },
                },
            }),
        )
    }

    fn new(id: EntityId, position: Position, kind: EntityKind) -> Self {
        Self {
            entity_number: id,
            kind,
            position,
            direction: None,
        }
    }

    /// Rotate the entity (engine direction units).
    pub fn facing(mut self, direction: u8) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Constant combinators only: start switched off.
    pub fn switched_off(mut self) -> Self {
        if let EntityKind::Constant(c) = &mut self.kind {
            c.control_behavior.is_on = Some(false);
        }
        self
    }
}

/// Circuit wire between two entity poles. Serialized as `[a, pole_a, b, pole_b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(
    from = "(EntityId, Pole, EntityId, Pole)",
    into = "(EntityId, Pole, EntityId, Pole)"
)]
pub struct Wire {
    pub a: EntityId,
    pub pole_a: Pole,
    pub b: EntityId,
    pub pole_b: Pole,
}

impl From<(EntityId, Pole, EntityId, Pole)> for Wire {
    fn from((a, pole_a, b, pole_b): (EntityId, Pole, EntityId, Pole)) -> Self {
        Self {
            a,
            pole_a,
            b,
            pole_b,
        }
    }
}

impl From<Wire> for (EntityId, Pole, EntityId, Pole) {
    fn from(w: Wire) -> Self {
        (w.a, w.pole_a, w.b, w.pole_b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IconSignal {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SignalType>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Icon {
    pub signal: IconSignal,
    pub index: u32,
}

/// The generated artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Blueprint {
    pub icons: Vec<Icon>,
    pub entities: Vec<Entity>,
    pub wires: Vec<Wire>,
    pub item: String,
    pub version: u64,
}

impl Blueprint {
    /// Empty blueprint with the player's icon and the fixed envelope.
    pub fn empty() -> Self {
        Self {
            icons: vec![Icon {
                signal: IconSignal {
                    kind: None,
                    name: "decider-combinator".to_string(),
                },
                index: 1,
            }],
            entities: Vec::new(),
            wires: Vec::new(),
            item: BLUEPRINT_ITEM.to_string(),
            version: BLUEPRINT_VERSION,
        }
    }

    /// Entity by id, relying on dense 1-based numbering.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.entities
            .get(idx)
            .filter(|e| e.entity_number == id)
    }

    /// Dense numbering and referential integrity of every wire.
    pub fn validate(&self) -> crate::LampreelResult<()> {
        for (i, e) in self.entities.iter().enumerate() {
            if e.entity_number.0 as usize != i + 1 {
                return Err(crate::LampreelError::generation(format!(
                    "entity at position {i} has number {}, expected {}",
                    e.entity_number.0,
                    i + 1
                )));
            }
        }
        let n = self.entities.len() as u32;
        for w in &self.wires {
            for id in [w.a, w.b] {
                if id.0 == 0 || id.0 > n {
                    return Err(crate::LampreelError::generation(format!(
                        "wire {w:?} references missing entity {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Top-level JSON object: the blueprint nested under `"blueprint"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlueprintDocument {
    pub blueprint: Blueprint,
}

#[cfg(test)]
#[path = "../../tests/unit/blueprint/model.rs"]
mod tests;
