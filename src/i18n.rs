//! Message catalog for the two supported display languages.
//!
//! Lookups never fail: a key missing from the active table comes back
//! verbatim, so an untranslated label is visible instead of blank.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// Spanish, the primary locale.
    #[default]
    Es,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    /// Token stored in the preference file.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// Key of the selector label for this locale.
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Es => "lang_es",
            Self::En => "lang_en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale {0:?}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

type Table = HashMap<&'static str, &'static str>;

static ES: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        ("products", "Productos"),
        ("verticals", "Verticales"),
        ("contact", "Contacto"),
        ("schedule_demo", "Agendar un Demo"),
        ("lang_es", "ES Español"),
        ("lang_en", "EN English"),
        ("hero_title", "Gestiona contactos rápidamente"),
        ("hero_lead", "Interfaz limpia para crear y actualizar contactos en HubSpot."),
        ("home_title", "Gestión de contactos"),
        ("view_contacts", "Ver contactos"),
        ("add_contact", "Agregar contacto"),
        ("app_note", "Aplicación de prueba técnica · integración con HubSpot"),
        ("panel_create_title", "Crear contacto"),
        ("panel_create_sub", "Rellena el formulario y guarda el contacto en HubSpot."),
        ("name_label", "Nombre"),
        ("lastname_label", "Apellido"),
        ("email_label", "Correo"),
        ("save_button", "Guardar"),
        ("save_button_full", "Guardar en HubSpot"),
        ("submitting", "Guardando…"),
        ("clear_button", "Limpiar"),
        ("invalid_email", "Correo inválido"),
        ("required_field", "Nombre y apellido son obligatorios"),
        ("network_error", "Error de red"),
        ("error_prefix", "Error"),
        ("list_title", "Contactos"),
        ("list_sub", "Lista de contactos recuperados desde HubSpot."),
        ("actions", "Acciones"),
        ("delete_button", "Borrar"),
        ("cancel_button", "Cancelar"),
        ("confirm_delete", "¿Borrar contacto {target}? Esta acción es irreversible."),
        ("delete_error", "Error borrando"),
        ("load_more", "Cargar más"),
        ("loading", "Cargando..."),
        ("no_contacts", "No hay contactos."),
        ("end_of_list", "Fin de la lista"),
        ("breadcrumb_home", "Inicio"),
        ("breadcrumb_contacts", "Contactos"),
        ("breadcrumb_add", "Agregar contacto"),
        ("kbd_hint", "Presiona Esc para volver"),
        ("footer_brand", "Prueba técnica"),
        ("footer_sub", "Integración HubSpot"),
        ("terms", "Términos y condiciones"),
        ("privacy", "Privacidad"),
    ])
});

static EN: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        ("products", "Products"),
        ("verticals", "Verticals"),
        ("contact", "Contact"),
        ("schedule_demo", "Schedule a demo"),
        ("lang_es", "ES Spanish"),
        ("lang_en", "EN English"),
        ("hero_title", "Manage contacts quickly"),
        ("hero_lead", "Clean UI to create and update contacts in HubSpot."),
        ("home_title", "Contact management"),
        ("view_contacts", "View contacts"),
        ("add_contact", "Add contact"),
        ("app_note", "Technical test app · HubSpot integration"),
        ("panel_create_title", "Create contact"),
        ("panel_create_sub", "Fill the form and save the contact into HubSpot."),
        ("name_label", "First name"),
        ("lastname_label", "Last name"),
        ("email_label", "Email"),
        ("save_button", "Save"),
        ("save_button_full", "Save to HubSpot"),
        ("submitting", "Saving…"),
        ("clear_button", "Clear"),
        ("invalid_email", "Invalid email"),
        ("required_field", "First and last name are required"),
        ("network_error", "Network error"),
        ("error_prefix", "Error"),
        ("list_title", "Contacts"),
        ("list_sub", "Contacts list fetched from HubSpot."),
        ("actions", "Actions"),
        ("delete_button", "Delete"),
        ("cancel_button", "Cancel"),
        ("confirm_delete", "Delete contact {target}? This action is irreversible."),
        ("delete_error", "Delete error"),
        ("load_more", "Load more"),
        ("loading", "Loading..."),
        ("no_contacts", "No contacts."),
        ("end_of_list", "End of list"),
        ("breadcrumb_home", "Home"),
        ("breadcrumb_contacts", "Contacts"),
        ("breadcrumb_add", "Add contact"),
        ("kbd_hint", "Press Esc to go back"),
        ("footer_brand", "Technical test"),
        ("footer_sub", "HubSpot integration"),
        ("terms", "Terms & conditions"),
        ("privacy", "Privacy"),
    ])
});

fn table(locale: Locale) -> &'static Table {
    match locale {
        Locale::Es => &*ES,
        Locale::En => &*EN,
    }
}

/// Looks `key` up for `locale`, falling back to the key itself.
pub fn lookup(locale: Locale, key: &str) -> String {
    table(locale)
        .get(key)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// [`lookup`] followed by `{name}` placeholder substitution.
pub fn lookup_with(locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
    let mut text = lookup(locale, key);
    for (name, value) in args {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}
