//! Minimal test protocol for end-to-end testing

use netlist_shared::{
    BitOptions, FloatConverter, HandleConverter, IntegerConverter, ListConverter, NetValue,
    ObjectHandle, QuantizedFloatConverter, RegistryError, StringConverter, TypeRegistry,
    TypeRegistryBuilder, Value, Vector3Converter,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Networked through its `u8` representation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Team {
    #[default]
    Spectator,
    Red,
    Blue,
}

impl NetValue for Team {
    fn to_value(&self) -> Value {
        Value::U8(match self {
            Team::Spectator => 0,
            Team::Red => 1,
            Team::Blue => 2,
        })
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::U8(0) => Some(Team::Spectator),
            Value::U8(1) => Some(Team::Red),
            Value::U8(2) => Some(Team::Blue),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Player {
    pub name: String,
    pub health: i32,
    pub team: Team,
    pub origin: [f32; 3],
    /// Only sent after `on_change("score")`
    pub score: u32,
    pub inventory: Vec<u16>,
    pub target: ObjectHandle,
    /// Quantized to eighths between -512 and 512
    pub speed: f32,
}

impl Player {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            health: 100,
            ..Default::default()
        }
    }
}

/// The receiving side's counterpart of `Player`, registered under another
/// name and mapped from the transmitter's type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemotePlayer {
    pub name: String,
    pub health: i32,
    pub team: Team,
    pub origin: [f32; 3],
    pub score: u32,
    pub inventory: Vec<u16>,
    pub target: ObjectHandle,
    pub speed: f32,
}

fn speed_converter() -> QuantizedFloatConverter {
    QuantizedFloatConverter::new(BitOptions::signed(14).with_multiplier(8.0))
}

fn register_point(builder: &mut TypeRegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register::<Point>()
        .with_name("Point")
        .field("x", FloatConverter, |p| &p.x, |p| &mut p.x)
        .field("y", FloatConverter, |p| &p.y, |p| &mut p.y)
        .with_default_factory()
        .build()?;
    Ok(())
}

/// Types registered by the transmitting side
pub fn registry() -> Result<TypeRegistry, RegistryError> {
    let mut builder = TypeRegistryBuilder::new();
    register_point(&mut builder)?;
    builder
        .register::<Player>()
        .with_name("Player")
        .field("name", StringConverter, |p| &p.name, |p| &mut p.name)
        .field("health", IntegerConverter::<i32>::new(), |p| &p.health, |p| &mut p.health)
        .field("team", IntegerConverter::<u8>::new(), |p| &p.team, |p| &mut p.team)
        .field("origin", Vector3Converter::new(), |p| &p.origin, |p| &mut p.origin)
        .field("score", IntegerConverter::<u32>::new(), |p| &p.score, |p| &mut p.score)
        .notify_on_change()
        .field(
            "inventory",
            ListConverter::new(IntegerConverter::<u16>::new()),
            |p| &p.inventory,
            |p| &mut p.inventory,
        )
        .field("target", HandleConverter, |p| &p.target, |p| &mut p.target)
        .field("speed", speed_converter(), |p| &p.speed, |p| &mut p.speed)
        .with_default_factory()
        .build()?;
    Ok(builder.build())
}

/// Types registered by a receiver that names its types differently and in
/// another order, relying on the type metadata handshake
pub fn client_registry() -> Result<TypeRegistry, RegistryError> {
    let mut builder = TypeRegistryBuilder::new();
    builder
        .register::<RemotePlayer>()
        .with_name("RemotePlayer")
        .maps_from("Player")
        .field("name", StringConverter, |p| &p.name, |p| &mut p.name)
        .field("health", IntegerConverter::<i32>::new(), |p| &p.health, |p| &mut p.health)
        .field("team", IntegerConverter::<u8>::new(), |p| &p.team, |p| &mut p.team)
        .field("origin", Vector3Converter::new(), |p| &p.origin, |p| &mut p.origin)
        .field("score", IntegerConverter::<u32>::new(), |p| &p.score, |p| &mut p.score)
        .notify_on_change()
        .field(
            "inventory",
            ListConverter::new(IntegerConverter::<u16>::new()),
            |p| &p.inventory,
            |p| &mut p.inventory,
        )
        .field("target", HandleConverter, |p| &p.target, |p| &mut p.target)
        .field("speed", speed_converter(), |p| &p.speed, |p| &mut p.speed)
        .with_default_factory()
        .build()?;
    register_point(&mut builder)?;
    Ok(builder.build())
}
