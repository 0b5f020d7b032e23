/*!
    Static descriptions of the `buffer` and `abuffer` filters.
*/

use ffmpeg_types::MediaType;

/**
    Registry entry for a source filter.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterDescriptor {
    /// Name used to instantiate the filter in a graph.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Media type of the single output.
    pub media_type: MediaType,
    /// Number of input pads.
    pub inputs: usize,
    /// Number of output pads.
    pub outputs: usize,
}

/// Video buffer source.
pub const BUFFER: FilterDescriptor = FilterDescriptor {
    name: "buffer",
    description: "Buffer video frames, and make them accessible to the filterchain.",
    media_type: MediaType::Video,
    inputs: 0,
    outputs: 1,
};

/// Audio buffer source.
pub const ABUFFER: FilterDescriptor = FilterDescriptor {
    name: "abuffer",
    description: "Buffer audio frames, and make them accessible to the filterchain.",
    media_type: MediaType::Audio,
    inputs: 0,
    outputs: 1,
};

impl FilterDescriptor {
    /**
        Look up a buffer source filter by name.
    */
    pub fn find(name: &str) -> Option<&'static FilterDescriptor> {
        [&BUFFER, &ABUFFER].into_iter().find(|f| f.name == name)
    }

    /**
        Returns the buffer source filter for a media type.
    */
    pub fn for_media_type(media_type: MediaType) -> &'static FilterDescriptor {
        match media_type {
            MediaType::Video => &BUFFER,
            MediaType::Audio => &ABUFFER,
        }
    }
}
