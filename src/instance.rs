// Vulkan instance
//
// Responsibilities:
// - Loading the Vulkan library and enumerating instance layers/extensions
// - Instance creation from an owned create-info
// - Surface creation for the supported window systems
// - Debug messenger that forwards validation output to `log`

use ash::extensions::{ext, khr};
use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use std::ffi::{c_void, CStr, CString};
use std::sync::Arc;

use crate::base::{fixed_cstr_to_string, NameList};
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::surface::{Surface, WaylandSurfaceCreateInfo};

fn load_entry() -> Result<ash::Entry> {
    // Safety: the loaded library is kept alive by the returned entry.
    let entry = unsafe { ash::Entry::load() }?;
    Ok(entry)
}

/// Properties of an instance layer, as reported by
/// `vkEnumerateInstanceLayerProperties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerProperties {
    layer_name: String,
    spec_version: u32,
    implementation_version: u32,
    description: String,
}

impl LayerProperties {
    pub fn enumerate() -> Result<Vec<LayerProperties>> {
        let entry = load_entry()?;
        let properties = entry.enumerate_instance_layer_properties()?;

        Ok(properties.iter().map(LayerProperties::from_raw).collect())
    }

    pub(crate) fn from_raw(raw: &vk::LayerProperties) -> Self {
        Self {
            layer_name: fixed_cstr_to_string(&raw.layer_name),
            spec_version: raw.spec_version,
            implementation_version: raw.implementation_version,
            description: fixed_cstr_to_string(&raw.description),
        }
    }

    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    pub fn spec_version(&self) -> u32 {
        self.spec_version
    }

    pub fn implementation_version(&self) -> u32 {
        self.implementation_version
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// An instance extension, as reported by
/// `vkEnumerateInstanceExtensionProperties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionProperties {
    extension_name: String,
    spec_version: u32,
}

impl ExtensionProperties {
    pub fn enumerate() -> Result<Vec<ExtensionProperties>> {
        let entry = load_entry()?;
        let properties = entry.enumerate_instance_extension_properties(None)?;

        Ok(properties.iter().map(ExtensionProperties::from_raw).collect())
    }

    pub(crate) fn from_raw(raw: &vk::ExtensionProperties) -> Self {
        Self {
            extension_name: fixed_cstr_to_string(&raw.extension_name),
            spec_version: raw.spec_version,
        }
    }

    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }

    pub fn spec_version(&self) -> u32 {
        self.spec_version
    }
}

/// Builder for `VkApplicationInfo`. Owns the name strings.
#[derive(Debug)]
pub struct ApplicationInfo {
    info: vk::ApplicationInfo,
    application_name: Option<CString>,
    engine_name: Option<CString>,
}

impl ApplicationInfo {
    pub fn new() -> Self {
        Self {
            info: vk::ApplicationInfo {
                api_version: vk::API_VERSION_1_0,
                ..Default::default()
            },
            application_name: None,
            engine_name: None,
        }
    }

    pub fn application_name(mut self, name: &str) -> Result<Self> {
        self.application_name =
            Some(CString::new(name).map_err(|_| Error::InvalidName(name.to_string()))?);
        self.repoint();
        Ok(self)
    }

    pub fn application_version(mut self, version: u32) -> Self {
        self.info.application_version = version;
        self
    }

    pub fn engine_name(mut self, name: &str) -> Result<Self> {
        self.engine_name =
            Some(CString::new(name).map_err(|_| Error::InvalidName(name.to_string()))?);
        self.repoint();
        Ok(self)
    }

    pub fn engine_version(mut self, version: u32) -> Self {
        self.info.engine_version = version;
        self
    }

    pub fn api_version(mut self, version: u32) -> Self {
        self.info.api_version = version;
        self
    }

    pub fn raw(&self) -> &vk::ApplicationInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.p_application_name = self
            .application_name
            .as_ref()
            .map_or(std::ptr::null(), |name| name.as_ptr());
        self.info.p_engine_name = self
            .engine_name
            .as_ref()
            .map_or(std::ptr::null(), |name| name.as_ptr());
    }
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ApplicationInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            application_name: self.application_name.clone(),
            engine_name: self.engine_name.clone(),
        };
        copy.repoint();
        copy
    }
}

/// Builder for `VkInstanceCreateInfo`.
///
/// Extension and layer names are copied into the builder; the
/// `ppEnabled*Names` arrays and their counts are filled automatically.
#[derive(Debug)]
pub struct InstanceCreateInfo {
    info: vk::InstanceCreateInfo,
    application_info: Option<Box<ApplicationInfo>>,
    extension_names: NameList,
    layer_names: NameList,
}

impl InstanceCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::InstanceCreateInfo::default(),
            application_info: None,
            extension_names: NameList::default(),
            layer_names: NameList::default(),
        }
    }

    pub fn application_info(mut self, info: ApplicationInfo) -> Self {
        self.application_info = Some(Box::new(info));
        self.repoint();
        self
    }

    pub fn enabled_extension_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.extension_names = NameList::new(names)?;
        self.repoint();
        Ok(self)
    }

    pub fn enabled_layer_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.layer_names = NameList::new(names)?;
        self.repoint();
        Ok(self)
    }

    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extension_names.names()
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layer_names.names()
    }

    pub fn raw(&self) -> &vk::InstanceCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.p_application_info = self
            .application_info
            .as_deref()
            .map_or(std::ptr::null(), |app| app.raw() as *const _);
        self.info.enabled_extension_count = self.extension_names.count();
        self.info.pp_enabled_extension_names = self.extension_names.as_ptr();
        self.info.enabled_layer_count = self.layer_names.count();
        self.info.pp_enabled_layer_names = self.layer_names.as_ptr();
    }
}

impl Default for InstanceCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InstanceCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            application_info: self.application_info.clone(),
            extension_names: self.extension_names.clone(),
            layer_names: self.layer_names.clone(),
        };
        copy.repoint();
        copy
    }
}

pub(crate) struct InstanceShared {
    pub(crate) raw: ash::Instance,
    pub(crate) surface_loader: khr::Surface,
    pub(crate) entry: ash::Entry,
}

impl Drop for InstanceShared {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan instance");
        unsafe {
            self.raw.destroy_instance(None);
        }
    }
}

/// A Vulkan instance. Cloning shares ownership; the instance is destroyed
/// when the last clone and the last object created from it are dropped.
#[derive(Clone)]
pub struct Instance {
    pub(crate) shared: Arc<InstanceShared>,
}

impl Instance {
    pub fn new(info: &InstanceCreateInfo) -> Result<Self> {
        let entry = load_entry()?;

        log::info!(
            "Creating Vulkan instance ({} extensions, {} layers)",
            info.raw().enabled_extension_count,
            info.raw().enabled_layer_count
        );
        for name in info.extension_names() {
            log::debug!(" - extension: {}", name);
        }
        for name in info.layer_names() {
            log::debug!(" - layer: {}", name);
        }

        let raw = unsafe { entry.create_instance(info.raw(), None) }?;
        let surface_loader = khr::Surface::new(&entry, &raw);

        Ok(Self {
            shared: Arc::new(InstanceShared {
                raw,
                surface_loader,
                entry,
            }),
        })
    }

    /// Create a Wayland surface from a Wayland display and surface.
    ///
    /// # Safety
    /// The display and surface pointers in `info` must be valid and outlive
    /// the returned surface.
    pub unsafe fn create_wayland_surface(
        &self,
        info: &WaylandSurfaceCreateInfo,
    ) -> Result<Surface> {
        let loader = khr::WaylandSurface::new(&self.shared.entry, &self.shared.raw);
        let raw = loader.create_wayland_surface(info.raw(), None)?;

        Ok(self.own_surface(raw))
    }

    /// Create a surface for a window, dispatching on the window system.
    ///
    /// # Safety
    /// The handles must refer to a live window and display that outlive the
    /// returned surface.
    pub unsafe fn create_surface(
        &self,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Surface> {
        let entry = &self.shared.entry;
        let instance = &self.shared.raw;

        let raw = match (display, window) {
            (RawDisplayHandle::Wayland(display), RawWindowHandle::Wayland(window)) => {
                let info = WaylandSurfaceCreateInfo::new(
                    display.display.as_ptr(),
                    window.surface.as_ptr(),
                );
                khr::WaylandSurface::new(entry, instance).create_wayland_surface(info.raw(), None)?
            }
            (RawDisplayHandle::Xlib(display), RawWindowHandle::Xlib(window)) => {
                let dpy = display
                    .display
                    .map_or(std::ptr::null_mut(), |dpy| dpy.as_ptr());
                let info = vk::XlibSurfaceCreateInfoKHR::builder()
                    .dpy(dpy as *mut vk::Display)
                    .window(window.window);
                khr::XlibSurface::new(entry, instance).create_xlib_surface(&info, None)?
            }
            (RawDisplayHandle::Xcb(display), RawWindowHandle::Xcb(window)) => {
                let connection = display
                    .connection
                    .map_or(std::ptr::null_mut(), |connection| connection.as_ptr());
                let info = vk::XcbSurfaceCreateInfoKHR::builder()
                    .connection(connection as *mut vk::xcb_connection_t)
                    .window(window.window.get());
                khr::XcbSurface::new(entry, instance).create_xcb_surface(&info, None)?
            }
            (RawDisplayHandle::Windows(_), RawWindowHandle::Win32(window)) => {
                let hinstance = window.hinstance.map_or(0, |h| h.get()) as *const c_void;
                let info = vk::Win32SurfaceCreateInfoKHR::builder()
                    .hinstance(hinstance)
                    .hwnd(window.hwnd.get() as *const c_void);
                khr::Win32Surface::new(entry, instance).create_win32_surface(&info, None)?
            }
            (display, _) => return Err(Error::UnsupportedPlatform(display_name(&display))),
        };

        log::debug!("Created surface {:?}", raw);
        Ok(self.own_surface(raw))
    }

    fn own_surface(&self, raw: vk::SurfaceKHR) -> Surface {
        let shared = Arc::clone(&self.shared);
        Surface::new(Handle::new(raw, move |surface| unsafe {
            shared.surface_loader.destroy_surface(surface, None);
        }))
    }

    /// Install a debug-utils messenger that logs validation messages of the
    /// given severities. Requires `VK_EXT_debug_utils` to be enabled.
    pub fn create_debug_messenger(
        &self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> Result<DebugMessenger> {
        let debug_utils = ext::DebugUtils::new(&self.shared.entry, &self.shared.raw);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(severity)
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let raw = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }?;

        let shared = Arc::clone(&self.shared);
        let handle = Handle::new(raw, move |messenger| unsafe {
            debug_utils.destroy_debug_utils_messenger(messenger, None);
            drop(shared);
        });

        Ok(DebugMessenger { handle })
    }

    pub fn c_ptr(&self) -> vk::Instance {
        self.shared.raw.handle()
    }

    pub fn ash(&self) -> &ash::Instance {
        &self.shared.raw
    }
}

/// Instance extensions needed to create a surface on `display`.
pub fn required_surface_extensions(display: RawDisplayHandle) -> Result<Vec<&'static CStr>> {
    let platform = match display {
        RawDisplayHandle::Wayland(_) => khr::WaylandSurface::name(),
        RawDisplayHandle::Xlib(_) => khr::XlibSurface::name(),
        RawDisplayHandle::Xcb(_) => khr::XcbSurface::name(),
        RawDisplayHandle::Windows(_) => khr::Win32Surface::name(),
        other => return Err(Error::UnsupportedPlatform(display_name(&other))),
    };

    Ok(vec![khr::Surface::name(), platform])
}

fn display_name(display: &RawDisplayHandle) -> &'static str {
    match display {
        RawDisplayHandle::Wayland(_) => "Wayland",
        RawDisplayHandle::Xlib(_) => "Xlib",
        RawDisplayHandle::Xcb(_) => "Xcb",
        RawDisplayHandle::Windows(_) => "Windows",
        RawDisplayHandle::AppKit(_) => "AppKit",
        RawDisplayHandle::UiKit(_) => "UiKit",
        RawDisplayHandle::Android(_) => "Android",
        RawDisplayHandle::Web(_) => "Web",
        _ => "other",
    }
}

/// A debug-utils messenger; unregistered when dropped.
pub struct DebugMessenger {
    handle: Handle<vk::DebugUtilsMessengerEXT>,
}

impl DebugMessenger {
    pub fn c_ptr(&self) -> vk::DebugUtilsMessengerEXT {
        self.handle.raw()
    }
}

unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*p_callback_data).p_message);

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            log::error!("[Vulkan] {}", message.to_string_lossy());
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            log::warn!("[Vulkan] {}", message.to_string_lossy());
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => {
            log::info!("[Vulkan] {}", message.to_string_lossy());
        }
        _ => {
            log::debug!("[Vulkan] {}", message.to_string_lossy());
        }
    }

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{WaylandDisplayHandle, WebDisplayHandle};
    use std::ptr::NonNull;

    #[test]
    fn create_info_counts_follow_names() {
        let info = InstanceCreateInfo::new()
            .enabled_extension_names(&["VK_KHR_surface", "VK_EXT_debug_utils"])
            .unwrap()
            .enabled_layer_names(&["VK_LAYER_KHRONOS_validation"])
            .unwrap();

        assert_eq!(info.raw().enabled_extension_count, 2);
        assert_eq!(info.raw().enabled_layer_count, 1);
        assert!(info.raw().p_application_info.is_null());

        let layer = unsafe { CStr::from_ptr(*info.raw().pp_enabled_layer_names) };
        assert_eq!(layer.to_str().unwrap(), "VK_LAYER_KHRONOS_validation");
    }

    #[test]
    fn empty_name_lists_are_null() {
        let info = InstanceCreateInfo::new()
            .enabled_extension_names::<&str>(&[])
            .unwrap();
        assert_eq!(info.raw().enabled_extension_count, 0);
        assert!(info.raw().pp_enabled_extension_names.is_null());
        assert!(info.raw().pp_enabled_layer_names.is_null());
    }

    #[test]
    fn application_info_survives_clone() {
        let app = ApplicationInfo::new()
            .application_name("vertex")
            .unwrap()
            .engine_name("prime")
            .unwrap()
            .api_version(vk::API_VERSION_1_2);
        let info = InstanceCreateInfo::new().application_info(app);
        let copy = info.clone();
        drop(info);

        let app = unsafe { &*copy.raw().p_application_info };
        let name = unsafe { CStr::from_ptr(app.p_application_name) };
        assert_eq!(name.to_str().unwrap(), "vertex");
        assert_eq!(app.api_version, vk::API_VERSION_1_2);
    }

    #[test]
    fn surface_extensions_per_platform() {
        let display = WaylandDisplayHandle::new(NonNull::dangling());
        let names = required_surface_extensions(RawDisplayHandle::Wayland(display)).unwrap();
        assert_eq!(names, vec![khr::Surface::name(), khr::WaylandSurface::name()]);

        let web = RawDisplayHandle::Web(WebDisplayHandle::new());
        assert!(matches!(
            required_surface_extensions(web),
            Err(Error::UnsupportedPlatform("Web"))
        ));
    }

    #[test]
    fn layer_properties_from_raw() {
        let mut raw = vk::LayerProperties::default();
        for (dst, src) in raw.layer_name.iter_mut().zip(b"VK_LAYER_test") {
            *dst = *src as _;
        }
        raw.spec_version = vk::API_VERSION_1_3;
        raw.implementation_version = 3;

        let props = LayerProperties::from_raw(&raw);
        assert_eq!(props.layer_name(), "VK_LAYER_test");
        assert_eq!(props.spec_version(), vk::API_VERSION_1_3);
        assert_eq!(props.implementation_version(), 3);
        assert_eq!(props.description(), "");
    }
}
