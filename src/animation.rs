//! Frame-sequence animation playback.
//!
//! An `Animation` owns a timing cursor over an immutable list of frames.
//! Cloning with [`Animation::clone_frames`] shares the frame list between
//! instances so many entities can play the same animation asset without
//! duplicating frame data; only the cursor is per-instance.

use std::rc::Rc;

use sdl2::rect::Rect;

use crate::assets::TextureId;

/// One frame of an animation: a texture and the sub-rectangle within it.
#[derive(Debug, Clone, Copy)]
pub struct SubImage {
    pub texture: TextureId,
    pub rect: Rect,
}

pub struct Animation {
    frames: Rc<Vec<SubImage>>,
    frame_time: f32,
    looping: bool,
    current_frame: usize,
    time: f64,
    next_update: f64,
    finished: bool,
}

impl Animation {
    pub fn new(frames: Vec<SubImage>, frame_time: f32, looping: bool) -> Self {
        Animation {
            frames: Rc::new(frames),
            frame_time,
            looping,
            current_frame: 0,
            time: 0.0,
            next_update: frame_time as f64,
            finished: false,
        }
    }

    /// Independent playback cursor over the same frame list. Frame time and
    /// looping carry over; the timers start fresh.
    pub fn clone_frames(&self) -> Self {
        Animation {
            frames: Rc::clone(&self.frames),
            frame_time: self.frame_time,
            looping: self.looping,
            current_frame: 0,
            time: 0.0,
            next_update: self.frame_time as f64,
            finished: false,
        }
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// True once a non-looping animation has exhausted its frames. Cleared
    /// only by [`Animation::reset`].
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_subimage(&self) -> Option<&SubImage> {
        self.frames.get(self.current_frame)
    }

    /// Advances the internal clock, stepping frames for every boundary the
    /// clock has crossed. Looping wraps modulo the frame count; non-looping
    /// stops on the last frame and parks the next boundary at infinity so it
    /// never fires again.
    pub fn update(&mut self, delta: f32) {
        if self.frames.is_empty() || self.frame_time <= 0.0 {
            return;
        }

        self.time += delta as f64;
        while self.time > self.next_update {
            if self.looping {
                self.next_update += self.frame_time as f64;
                self.current_frame = (self.current_frame + 1) % self.frames.len();
            } else {
                self.next_update += self.frame_time as f64;
                self.current_frame += 1;
                if self.current_frame > self.frames.len() - 1 {
                    self.current_frame = self.frames.len() - 1;
                    self.next_update = f64::INFINITY;
                    self.finished = true;
                }
            }
        }
    }

    /// Back to the first frame; the next boundary is one frame time away.
    pub fn reset(&mut self) {
        self.next_update = self.time + self.frame_time as f64;
        self.current_frame = 0;
        self.finished = false;
    }
}
