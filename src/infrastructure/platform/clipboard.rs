use crate::domain::error::AppError;
use crate::domain::selection::{ClipboardItem, ClipboardSnapshot};
use crate::domain::traits::ClipboardPort;
use clipboard_rs::{Clipboard, ClipboardContext};
#[cfg(not(target_os = "macos"))]
use {crate::domain::selection::Representation, clipboard_rs::ClipboardContent};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, debug_span};

fn map_clipboard_err<T>(
    result: Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T, AppError> {
    result.map_err(|e| AppError::Clipboard(e.to_string()))
}

/// The OS clipboard. Text reads go through clipboard-rs everywhere.
///
/// On macOS snapshots go straight to `NSPasteboard`, item by item, so a
/// multi-item pasteboard (several files in Finder) comes back intact.
/// Elsewhere the clipboard holds a single owner with several targets and
/// clipboard-rs sees exactly that: one item, every readable format.
pub struct SystemClipboard {
    inner: Mutex<ClipboardContext>,
    #[cfg(not(target_os = "macos"))]
    counter: Mutex<FingerprintCounter>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, AppError> {
        let context = map_clipboard_err(ClipboardContext::new())?;
        Ok(Self {
            inner: Mutex::new(context),
            #[cfg(not(target_os = "macos"))]
            counter: Mutex::new(FingerprintCounter::default()),
        })
    }

    fn ctx(&self) -> Result<MutexGuard<'_, ClipboardContext>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Clipboard("clipboard lock poisoned".to_string()))
    }

    #[cfg(not(target_os = "macos"))]
    fn read_representations(ctx: &ClipboardContext) -> Result<Vec<Representation>, AppError> {
        let formats = map_clipboard_err(ctx.available_formats())?;
        let mut reps = Vec::with_capacity(formats.len());
        for format in formats {
            match ctx.get_buffer(&format) {
                Ok(bytes) => reps.push(Representation { format, bytes }),
                Err(e) => debug!(format = %format, error = %e, "Skipping unreadable clipboard format"),
            }
        }
        Ok(reps)
    }

    #[cfg(target_os = "macos")]
    fn read_items(&self) -> Result<Vec<ClipboardItem>, AppError> {
        Ok(macos::read_items())
    }

    #[cfg(not(target_os = "macos"))]
    fn read_items(&self) -> Result<Vec<ClipboardItem>, AppError> {
        let representations = {
            let ctx = self.ctx()?;
            Self::read_representations(&ctx)?
        };
        if representations.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ClipboardItem { representations }])
    }

    #[cfg(target_os = "macos")]
    fn write_items(&self, items: &[ClipboardItem]) -> Result<(), AppError> {
        macos::write_items(items)
    }

    #[cfg(not(target_os = "macos"))]
    fn write_items(&self, items: &[ClipboardItem]) -> Result<(), AppError> {
        let ctx = self.ctx()?;
        map_clipboard_err(ctx.clear())?;
        let contents: Vec<ClipboardContent> = items
            .iter()
            .flat_map(|item| item.representations.iter())
            .map(|rep| ClipboardContent::Other(rep.format.clone(), rep.bytes.clone()))
            .collect();
        if contents.is_empty() {
            return Ok(());
        }
        map_clipboard_err(ctx.set(contents))
    }
}

impl ClipboardPort for SystemClipboard {
    #[cfg(target_os = "macos")]
    fn change_count(&self) -> Result<u64, AppError> {
        Ok(macos::pasteboard_change_count())
    }

    #[cfg(not(target_os = "macos"))]
    fn change_count(&self) -> Result<u64, AppError> {
        let reps = {
            let ctx = self.ctx()?;
            Self::read_representations(&ctx)?
        };
        let mut counter = self
            .counter
            .lock()
            .map_err(|_| AppError::Clipboard("change counter lock poisoned".to_string()))?;
        Ok(counter.observe(&reps))
    }

    fn read_text(&self) -> Result<Option<String>, AppError> {
        let ctx = self.ctx()?;
        match ctx.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                debug!(error = %e, "No text on clipboard");
                Ok(None)
            }
        }
    }

    fn capture(&self) -> Result<ClipboardSnapshot, AppError> {
        let span = debug_span!("clipboard.capture");
        span.in_scope(|| {
            let change_count = self.change_count()?;
            let items = self.read_items()?;
            let snapshot = ClipboardSnapshot {
                items,
                change_count,
            };
            debug!(
                items = snapshot.items.len(),
                total_size_bytes = snapshot.total_size_bytes(),
                "Captured clipboard snapshot"
            );
            Ok(snapshot)
        })
    }

    fn restore(&self, snapshot: &ClipboardSnapshot) -> Result<(), AppError> {
        let span = debug_span!("clipboard.restore", items = snapshot.items.len());
        span.in_scope(|| {
            self.write_items(&snapshot.items)?;
            if snapshot.is_empty() {
                debug!("Clipboard was empty, left empty");
            } else {
                debug!("Restored clipboard snapshot");
            }
            Ok(())
        })
    }

    fn restore_survives_exit(&self) -> bool {
        cfg!(any(target_os = "macos", windows))
    }
}

/// Change counter for platforms without a native one: bumps whenever the
/// observed content differs from the previous observation.
#[cfg(not(target_os = "macos"))]
#[derive(Debug, Default)]
struct FingerprintCounter {
    last: Option<u64>,
    count: u64,
}

#[cfg(not(target_os = "macos"))]
impl FingerprintCounter {
    fn observe(&mut self, reps: &[Representation]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        for rep in reps {
            rep.format.hash(&mut hasher);
            rep.bytes.hash(&mut hasher);
        }
        let fingerprint = hasher.finish();
        if self.last != Some(fingerprint) {
            if self.last.is_some() {
                self.count += 1;
            }
            self.last = Some(fingerprint);
        }
        self.count
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use crate::domain::error::AppError;
    use crate::domain::selection::{ClipboardItem, Representation};
    use objc::runtime::{Object, BOOL, NO};
    use objc::{class, msg_send, sel, sel_impl};
    use std::ffi::{c_char, c_void, CStr};

    #[link(name = "AppKit", kind = "framework")]
    extern "C" {}

    const NS_UTF8_STRING_ENCODING: usize = 4;

    /// Drains on drop; every autoreleased object below belongs to it.
    struct AutoreleasePool(*mut Object);

    impl AutoreleasePool {
        fn new() -> Self {
            Self(unsafe { msg_send![class!(NSAutoreleasePool), new] })
        }
    }

    impl Drop for AutoreleasePool {
        fn drop(&mut self) {
            unsafe {
                let _: () = msg_send![self.0, drain];
            }
        }
    }

    unsafe fn general_pasteboard() -> *mut Object {
        msg_send![class!(NSPasteboard), generalPasteboard]
    }

    unsafe fn ns_string(value: &str) -> *mut Object {
        let string: *mut Object = msg_send![class!(NSString), alloc];
        let string: *mut Object = msg_send![string,
            initWithBytes: value.as_ptr() as *const c_void
            length: value.len()
            encoding: NS_UTF8_STRING_ENCODING];
        msg_send![string, autorelease]
    }

    unsafe fn rust_string(string: *mut Object) -> Option<String> {
        if string.is_null() {
            return None;
        }
        let utf8: *const c_char = msg_send![string, UTF8String];
        if utf8.is_null() {
            return None;
        }
        Some(CStr::from_ptr(utf8).to_string_lossy().into_owned())
    }

    unsafe fn data_bytes(data: *mut Object) -> Vec<u8> {
        let length: usize = msg_send![data, length];
        let bytes: *const u8 = msg_send![data, bytes];
        if length == 0 || bytes.is_null() {
            return Vec::new();
        }
        std::slice::from_raw_parts(bytes, length).to_vec()
    }

    pub fn pasteboard_change_count() -> u64 {
        // SAFETY: generalPasteboard is a shared singleton and changeCount
        // is a plain NSInteger getter.
        unsafe {
            let count: isize = msg_send![general_pasteboard(), changeCount];
            count.max(0) as u64
        }
    }

    /// Every pasteboard item with every type it declares, in order.
    pub fn read_items() -> Vec<ClipboardItem> {
        let _pool = AutoreleasePool::new();
        unsafe {
            let items: *mut Object = msg_send![general_pasteboard(), pasteboardItems];
            if items.is_null() {
                return Vec::new();
            }
            let count: usize = msg_send![items, count];
            let mut captured = Vec::with_capacity(count);
            for idx in 0..count {
                let item: *mut Object = msg_send![items, objectAtIndex: idx];
                let types: *mut Object = msg_send![item, types];
                let type_count: usize = if types.is_null() { 0 } else { msg_send![types, count] };
                let mut representations = Vec::with_capacity(type_count);
                for type_idx in 0..type_count {
                    let ty: *mut Object = msg_send![types, objectAtIndex: type_idx];
                    let Some(format) = rust_string(ty) else {
                        continue;
                    };
                    let data: *mut Object = msg_send![item, dataForType: ty];
                    if data.is_null() {
                        // promised types with no data yet
                        continue;
                    }
                    representations.push(Representation {
                        format,
                        bytes: data_bytes(data),
                    });
                }
                captured.push(ClipboardItem { representations });
            }
            captured
        }
    }

    /// Clear the pasteboard, then write one `NSPasteboardItem` per item.
    pub fn write_items(items: &[ClipboardItem]) -> Result<(), AppError> {
        let _pool = AutoreleasePool::new();
        unsafe {
            let pasteboard = general_pasteboard();
            let _: isize = msg_send![pasteboard, clearContents];
            if items.iter().all(|i| i.representations.is_empty()) {
                return Ok(());
            }

            let objects: *mut Object =
                msg_send![class!(NSMutableArray), arrayWithCapacity: items.len()];
            for item in items {
                let pb_item: *mut Object = msg_send![class!(NSPasteboardItem), new];
                for rep in &item.representations {
                    let data: *mut Object = msg_send![class!(NSData),
                        dataWithBytes: rep.bytes.as_ptr() as *const c_void
                        length: rep.bytes.len()];
                    let ok: BOOL = msg_send![pb_item, setData: data forType: ns_string(&rep.format)];
                    if ok == NO {
                        tracing::debug!(format = %rep.format, "Pasteboard refused a representation");
                    }
                }
                let _: () = msg_send![objects, addObject: pb_item];
                let _: () = msg_send![pb_item, release];
            }

            let written: BOOL = msg_send![pasteboard, writeObjects: objects];
            if written == NO {
                return Err(AppError::Clipboard(
                    "pasteboard rejected the restored items".to_string(),
                ));
            }
            Ok(())
        }
    }
}
