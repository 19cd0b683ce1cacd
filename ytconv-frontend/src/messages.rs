/* This file is part of the ytconv project
*
*  Copyright (C) 2025 mini_bomba
*  
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! User-facing texts

use ytconv_api::MediaFormat;

pub const MISSING_URL:      &str = "Por favor, introduce un enlace de YouTube.";
pub const INVALID_URL:      &str = "URL de YouTube inválida";
pub const DOWNLOAD_FAILED:  &str = "Error en la descarga";
pub const CONVERSION_FAILED: &str = "Ocurrió un error al convertir o descargar el video.";
pub const UPDATE_FAILED:    &str = "No se pudo actualizar yt-dlp.";
pub const UPDATE_DONE:      &str = "yt-dlp actualizado correctamente.";
pub const UPDATE_RUNNING:   &str = "Actualizando yt-dlp...";
pub const DOWNLOADING:      &str = "Descargando...";
pub const LOADING:          &str = "Cargando...";
pub const UNKNOWN_DURATION: &str = "Desconocida";
pub const DEFAULT_TITLE:    &str = "Video de YouTube";
pub const THUMBNAIL_ALT:    &str = "Miniatura del video";
pub const CHANNEL_LABEL:    &str = "Canal:";
pub const DURATION_LABEL:   &str = "Duración:";
pub const VIEWS_LABEL:      &str = "Vistas:";
pub const PAGE_TITLE:       &str = "Convertidor de YouTube a MP3 / MP4";
pub const URL_PLACEHOLDER:  &str = "Pega aquí el enlace de YouTube";
pub const UPDATE_BUTTON:    &str = "Actualizar yt-dlp";
pub const BUILT_LABEL:      &str = "compilado el";

pub fn processing(format: MediaFormat) -> String {
    format!("Procesando {}...", format.label())
}

pub fn downloaded(format: MediaFormat) -> String {
    format!("¡{} descargado correctamente!", format.label())
}

pub fn button_label(format: MediaFormat) -> String {
    format!("Descargar {}", format.label())
}

/// Prefixes an error for the `#error` slot
pub fn error(detail: &str) -> String {
    format!("Error: {detail}")
}
