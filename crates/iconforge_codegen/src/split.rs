//! Size-bounded splitting of long paths
//!
//! Very long builder lambdas hit JVM method size limits, so oversized paths are cut into
//! chunks that each become a separate helper routine.

use iconforge_svg::{to_path_data, DrawingCommand, PathParser, Point};

/// Largest number of commands emitted inline in one routine
pub const DEFAULT_MAX_COMMANDS: usize = 300;

/// One slice of a split path
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Pen position when this chunk starts drawing
    pub origin: Point,
    /// The chunk's commands as path-data text
    pub path_data: String,
    /// Number of commands in the chunk
    pub len: usize,
}

impl Chunk {
    /// Parse the chunk back into commands, starting from its origin
    pub fn commands(&self) -> Vec<DrawingCommand> {
        PathParser::with_origin(&self.path_data, self.origin).parse()
    }
}

/// Whether a path of `len` commands must be split
pub fn needs_split(len: usize, max_commands: usize) -> bool {
    len > max_commands.max(1)
}

/// Cut commands into ordered chunks of at most `max_commands`.
///
/// Boundaries fall only between commands. The pen position is carried across chunks so
/// each can be re-parsed on its own.
pub fn split_commands(commands: &[DrawingCommand], max_commands: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut pen = Point::ZERO;

    for slice in commands.chunks(max_commands.max(1)) {
        chunks.push(Chunk {
            origin: pen,
            path_data: to_path_data(slice, pen),
            len: slice.len(),
        });
        pen = slice.iter().fold(pen, |pen, command| command.end_point(pen));
    }

    chunks
}
