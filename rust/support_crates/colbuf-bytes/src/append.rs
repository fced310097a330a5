//! Fixed-width scalar appends on top of [`ByteBuffer::append`].
//!
//! Values are written in the host's native byte order, with no
//! normalization.

use colbuf_common::Result;

use crate::buffer::ByteBuffer;

impl ByteBuffer {
    /// Appends the raw bytes of `value`.
    #[inline]
    pub fn append_value<T>(&mut self, value: T) -> Result<()>
    where
        T: bytemuck::NoUninit,
    {
        self.append(bytemuck::bytes_of(&value))
    }

    /// Appends the raw bytes of every element of `values`.
    #[inline]
    pub fn append_typed_slice<T>(&mut self, values: &[T]) -> Result<()>
    where
        T: bytemuck::NoUninit,
    {
        self.append(bytemuck::cast_slice(values))
    }
}

macro_rules! scalar_appends {
    ($($name:ident => $ty:ty),* $(,)?) => {
        impl ByteBuffer {
            $(
                #[doc = concat!("Appends a `", stringify!($ty), "` in native byte order.")]
                #[inline]
                pub fn $name(&mut self, value: $ty) -> Result<()> {
                    self.append_value(value)
                }
            )*
        }
    };
}

scalar_appends! {
    append_i8 => i8,
    append_u8 => u8,
    append_i16 => i16,
    append_u16 => u16,
    append_i32 => i32,
    append_u32 => u32,
    append_i64 => i64,
    append_u64 => u64,
    append_f32 => f32,
    append_f64 => f64,
}
