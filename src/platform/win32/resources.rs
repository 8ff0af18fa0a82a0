// ── Bundled resources ─────────────────────────────────────────────────────────
//
// The configuration record is an RT_RCDATA blob; the splash image is an
// ordinary BITMAP resource.  Both live in the host module.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{HINSTANCE, HMODULE},
        Graphics::Gdi::{DeleteObject, GetObjectW, LoadBitmapW, BITMAP, HBITMAP, HGDIOBJ},
        System::LibraryLoader::{FindResourceW, LoadResource, LockResource, SizeofResource},
        UI::WindowsAndMessaging::RT_RCDATA,
    },
};

use super::last_error;
use crate::error::{hresult_from_win32, Result, SplashError};
use crate::placement::Size;

/// `ERROR_RESOURCE_DATA_NOT_FOUND`.
const ERROR_RESOURCE_DATA_NOT_FOUND: i32 = 1812;

/// An owned GDI bitmap, deleted on drop.
#[derive(Debug)]
pub struct GdiBitmap(HBITMAP);

impl GdiBitmap {
    pub(crate) fn handle(&self) -> HBITMAP {
        self.0
    }
}

impl Drop for GdiBitmap {
    fn drop(&mut self) {
        // SAFETY: the bitmap was created by LoadBitmapW, is owned solely by
        // this value and is no longer selected into any DC once painting ends.
        unsafe {
            let _ = DeleteObject(HGDIOBJ(self.0 .0));
        }
    }
}

/// `MAKEINTRESOURCEW(id)`.
fn int_resource(id: u16) -> PCWSTR {
    PCWSTR(id as usize as *const u16)
}

/// Copy the RT_RCDATA resource `id` out of `instance`.
pub(crate) fn read_rcdata(instance: HINSTANCE, id: u16) -> Result<Vec<u8>> {
    let module = HMODULE(instance.0);
    let missing = |code: u32| SplashError::ConfigurationMissing { resource_id: id, code };

    // SAFETY: module is the host's loaded image; resource handles returned by
    // FindResourceW/LoadResource stay valid for the module's lifetime, and the
    // locked pointer covers exactly SizeofResource bytes.
    unsafe {
        let info = FindResourceW(module, int_resource(id), RT_RCDATA);
        if info.is_invalid() {
            return Err(missing(hresult_from_win32(ERROR_RESOURCE_DATA_NOT_FOUND)));
        }

        let data = LoadResource(module, info).map_err(|e| missing(e.code().0 as u32))?;

        let ptr = LockResource(data);
        if ptr.is_null() {
            return Err(missing(hresult_from_win32(ERROR_RESOURCE_DATA_NOT_FOUND)));
        }

        let len = SizeofResource(module, info) as usize;
        Ok(std::slice::from_raw_parts(ptr as *const u8, len).to_vec())
    }
}

/// Load BITMAP resource `id` and read its natural size.
pub(crate) fn load_bitmap(instance: HINSTANCE, id: u16) -> Result<(GdiBitmap, Size)> {
    // SAFETY: instance is the host module; the id is passed as an integer
    // resource name, which LoadBitmapW accepts.
    let hbitmap = unsafe { LoadBitmapW(instance, int_resource(id)) };
    if hbitmap.is_invalid() {
        return Err(last_error("LoadBitmapW"));
    }
    let bitmap = GdiBitmap(hbitmap);

    let mut info = BITMAP::default();
    // SAFETY: info is a live BITMAP and the size passed matches it.
    let copied = unsafe {
        GetObjectW(
            bitmap.handle(),
            std::mem::size_of::<BITMAP>() as i32,
            Some(&mut info as *mut BITMAP as *mut c_void),
        )
    };
    if copied == 0 {
        return Err(last_error("GetObjectW"));
    }

    Ok((bitmap, Size::new(info.bmWidth, info.bmHeight)))
}
