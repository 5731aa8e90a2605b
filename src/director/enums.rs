use num_derive::FromPrimitive;

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
pub enum CastType {
    Null = 0,
    Bitmap = 1,
    FilmLoop = 2,
    Field = 3,
    Palette = 4,
    Picture = 5,
    Sound = 6,
    Button = 7,
    Shape = 8,
    Movie = 9,
    DigitalVideo = 10,
    Script = 11,
    Text = 12,
    Ole = 13,
    Transition = 14,
    Unknown = 255,
}

impl CastType {
    pub fn from(val: u32) -> CastType {
        num::FromPrimitive::from_u32(val).unwrap_or(CastType::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CastType::Null => "Null",
            CastType::Bitmap => "Bitmap",
            CastType::FilmLoop => "Film Loop",
            CastType::Field => "Field",
            CastType::Palette => "Palette",
            CastType::Picture => "Picture",
            CastType::Sound => "Sound",
            CastType::Button => "Button",
            CastType::Shape => "Shape",
            CastType::Movie => "Movie",
            CastType::DigitalVideo => "Digital Video",
            CastType::Script => "Script",
            CastType::Text => "Text",
            CastType::Ole => "OLE",
            CastType::Transition => "Transition",
            CastType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Copy, Clone, FromPrimitive, PartialEq, Eq)]
pub enum ScriptType {
    Invalid = 0,
    Movie = 1,
    Score = 3,
    Parent = 7,
    Unknown = 255,
}

impl ScriptType {
    pub fn from(val: u16) -> ScriptType {
        num::FromPrimitive::from_u16(val).unwrap_or(ScriptType::Unknown)
    }

    /// Role label used when annotating decompiled scripts.
    pub fn role(raw: u16) -> String {
        match ScriptType::from(raw) {
            ScriptType::Movie => "movie".to_owned(),
            ScriptType::Score => "score".to_owned(),
            ScriptType::Parent => "parent".to_owned(),
            _ => format!("type_{}", raw),
        }
    }
}
