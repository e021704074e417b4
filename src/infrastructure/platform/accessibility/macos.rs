//! AXUIElement bridge over accessibility-sys and core-foundation.
//!
//! Every object coming back from a Copy/Create call is wrapped with
//! `wrap_under_create_rule`, borrowed ones with `wrap_under_get_rule`, so
//! core-foundation owns all retain/release bookkeeping.

use crate::domain::selection::{AxAttribute, AxValue, TextRange};
use crate::domain::traits::AccessibilityTree;
use accessibility_sys::{
    kAXChildrenAttribute, kAXErrorSuccess, kAXFocusedApplicationAttribute,
    kAXFocusedUIElementAttribute, kAXFocusedWindowAttribute, kAXSelectedTextAttribute,
    kAXSelectedTextRangeAttribute, kAXValueAttribute, kAXValueTypeCFRange,
    AXUIElementCopyAttributeValue, AXUIElementCopyParameterizedAttributeValue,
    AXUIElementCreateSystemWide, AXUIElementGetTypeID, AXUIElementRef, AXValueCreate,
    AXValueGetTypeID, AXValueGetValue, AXValueRef,
};
use core_foundation::base::{CFType, TCFType};
use core_foundation::string::CFString;
use core_foundation_sys::array::{CFArrayGetCount, CFArrayGetTypeID, CFArrayGetValueAtIndex, CFArrayRef};
use core_foundation_sys::attributed_string::{
    CFAttributedStringGetString, CFAttributedStringGetTypeID, CFAttributedStringRef,
};
use core_foundation_sys::base::{CFIndex, CFRange, CFTypeRef};
use std::ffi::c_void;
use std::ptr;

const ATTRIBUTED_STRING_FOR_RANGE: &str = "AXAttributedStringForRange";

/// A retained AXUIElement.
#[derive(Clone)]
pub struct AxElement(CFType);

impl AxElement {
    fn from_value(value: CFType) -> Option<Self> {
        (value.type_of() == unsafe { AXUIElementGetTypeID() }).then_some(AxElement(value))
    }

    fn raw(&self) -> AXUIElementRef {
        self.0.as_CFTypeRef() as AXUIElementRef
    }

    fn copy_attribute(&self, name: &str) -> Option<CFType> {
        let attribute = CFString::new(name);
        let mut value: CFTypeRef = ptr::null();
        let err = unsafe {
            AXUIElementCopyAttributeValue(self.raw(), attribute.as_concrete_TypeRef(), &mut value)
        };
        if err != kAXErrorSuccess || value.is_null() {
            return None;
        }
        Some(unsafe { CFType::wrap_under_create_rule(value) })
    }

    fn element_attribute(&self, name: &str) -> Option<AxElement> {
        self.copy_attribute(name).and_then(AxElement::from_value)
    }

    fn string_attribute(&self, name: &str) -> Option<String> {
        self.copy_attribute(name)?
            .downcast::<CFString>()
            .map(|s| s.to_string())
    }

    fn range_attribute(&self, name: &str) -> Option<TextRange> {
        let value = self.copy_attribute(name)?;
        if value.type_of() != unsafe { AXValueGetTypeID() } {
            return None;
        }
        let mut range = CFRange::init(0, 0);
        let ok = unsafe {
            AXValueGetValue(
                value.as_CFTypeRef() as AXValueRef,
                kAXValueTypeCFRange,
                &mut range as *mut CFRange as *mut c_void,
            )
        };
        ok.then(|| TextRange::new(range.location as i64, range.length as i64))
    }
}

/// The live macOS accessibility tree. Requires the Accessibility
/// permission; without it every query simply returns nothing.
pub struct MacAccessibility {
    system_wide: AxElement,
}

impl MacAccessibility {
    pub fn new() -> Self {
        let system_wide = unsafe { CFType::wrap_under_create_rule(AXUIElementCreateSystemWide() as CFTypeRef) };
        Self {
            system_wide: AxElement(system_wide),
        }
    }
}

impl Default for MacAccessibility {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessibilityTree for MacAccessibility {
    type Node = AxElement;

    fn focused_element(&self) -> Option<AxElement> {
        self.system_wide
            .element_attribute(kAXFocusedUIElementAttribute)
    }

    fn focused_window(&self) -> Option<AxElement> {
        self.system_wide
            .element_attribute(kAXFocusedWindowAttribute)
            .or_else(|| {
                self.system_wide
                    .element_attribute(kAXFocusedApplicationAttribute)?
                    .element_attribute(kAXFocusedWindowAttribute)
            })
    }

    fn children(&self, node: &AxElement) -> Vec<AxElement> {
        let Some(array) = node.copy_attribute(kAXChildrenAttribute) else {
            return Vec::new();
        };
        if array.type_of() != unsafe { CFArrayGetTypeID() } {
            return Vec::new();
        }
        let array = array.as_CFTypeRef() as CFArrayRef;
        let count = unsafe { CFArrayGetCount(array) };
        (0..count)
            .filter_map(|idx| {
                let child = unsafe { CFArrayGetValueAtIndex(array, idx) };
                if child.is_null() {
                    return None;
                }
                // array entries are borrowed
                AxElement::from_value(unsafe { CFType::wrap_under_get_rule(child) })
            })
            .collect()
    }

    fn attribute(&self, node: &AxElement, key: AxAttribute) -> Option<AxValue> {
        match key {
            AxAttribute::SelectedText => node
                .string_attribute(kAXSelectedTextAttribute)
                .map(AxValue::Text),
            AxAttribute::Value => node.string_attribute(kAXValueAttribute).map(AxValue::Text),
            AxAttribute::SelectedTextRange => node
                .range_attribute(kAXSelectedTextRangeAttribute)
                .map(AxValue::Range),
        }
    }

    fn string_for_range(&self, node: &AxElement, range: TextRange) -> Option<String> {
        let cf_range = CFRange::init(range.location as CFIndex, range.length as CFIndex);
        let parameter = unsafe {
            AXValueCreate(kAXValueTypeCFRange, &cf_range as *const CFRange as *const c_void)
        };
        if parameter.is_null() {
            return None;
        }
        let parameter = unsafe { CFType::wrap_under_create_rule(parameter as CFTypeRef) };
        let attribute = CFString::new(ATTRIBUTED_STRING_FOR_RANGE);
        let mut result: CFTypeRef = ptr::null();
        let err = unsafe {
            AXUIElementCopyParameterizedAttributeValue(
                node.raw(),
                attribute.as_concrete_TypeRef(),
                parameter.as_CFTypeRef(),
                &mut result,
            )
        };
        if err != kAXErrorSuccess || result.is_null() {
            return None;
        }
        let result = unsafe { CFType::wrap_under_create_rule(result) };
        if result.type_of() != unsafe { CFAttributedStringGetTypeID() } {
            return result.downcast::<CFString>().map(|s| s.to_string());
        }
        // plain string is borrowed from the attributed string
        let plain = unsafe { CFAttributedStringGetString(result.as_CFTypeRef() as CFAttributedStringRef) };
        if plain.is_null() {
            return None;
        }
        Some(unsafe { CFString::wrap_under_get_rule(plain) }.to_string())
    }
}
