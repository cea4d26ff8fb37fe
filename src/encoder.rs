use crate::error::Result;
use crate::icondir::{IconDir, IconDirEntry};
use crate::render::{Resampling, SourceImage};
use crate::size::IconSize;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

//===========================================================================//

/// Settings for building ICO files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct EncodeOptions {
    /// The filter used to scale the source to each icon size.
    pub resampling: Resampling,
}

impl EncodeOptions {
    /// Returns these options with a different resampling filter.
    pub fn with_resampling(mut self, resampling: Resampling) -> EncodeOptions {
        self.resampling = resampling;
        self
    }
}

//===========================================================================//

/// Builds ICO files holding one PNG rendition of a source image per
/// requested size.
#[derive(Clone, Debug, Default)]
pub struct IcoEncoder {
    options: EncodeOptions,
}

impl IcoEncoder {
    /// Creates an encoder with the given options.
    pub fn new(options: EncodeOptions) -> IcoEncoder {
        IcoEncoder { options }
    }

    /// Returns the options this encoder was created with.
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Renders `source` at every size in `sizes` and packs the PNG-encoded
    /// results into an ICO file.
    ///
    /// Entries appear in exactly the order of `sizes`; repeated sizes produce
    /// repeated entries.  The source is stretched to each size without
    /// preserving its aspect ratio.
    #[instrument(skip_all, fields(count = sizes.len()))]
    pub fn encode(
        &self,
        source: &SourceImage,
        sizes: &[IconSize],
    ) -> Result<Vec<u8>> {
        let icondir = self.build(source, sizes)?;
        let output = icondir.to_bytes()?;
        debug!(len = output.len(), "ICO file written");
        Ok(output)
    }

    /// Like `encode`, but returns the directory instead of serializing it.
    pub fn build(
        &self,
        source: &SourceImage,
        sizes: &[IconSize],
    ) -> Result<IconDir> {
        if sizes.is_empty() {
            invalid_input!("At least one icon size is required");
        }
        if sizes.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many icon sizes (was {}, but max is {})",
                sizes.len(),
                u16::MAX
            );
        }
        for size in sizes {
            size.validate()?;
        }
        let mut icondir = IconDir::new();
        for entry in self.render_all(source, sizes)? {
            icondir.add_entry(entry);
        }
        Ok(icondir)
    }

    #[cfg(not(feature = "parallel"))]
    fn render_all(
        &self,
        source: &SourceImage,
        sizes: &[IconSize],
    ) -> Result<Vec<IconDirEntry>> {
        sizes.iter().map(|&size| self.render_entry(source, size)).collect()
    }

    // Each size renders onto its own surface, so the steps are independent;
    // collecting an indexed parallel iterator keeps request order.
    #[cfg(feature = "parallel")]
    fn render_all(
        &self,
        source: &SourceImage,
        sizes: &[IconSize],
    ) -> Result<Vec<IconDirEntry>> {
        sizes.par_iter().map(|&size| self.render_entry(source, size)).collect()
    }

    fn render_entry(
        &self,
        source: &SourceImage,
        size: IconSize,
    ) -> Result<IconDirEntry> {
        let image = source.render(size, self.options.resampling)?;
        let png = image.to_png()?;
        debug!(%size, png_len = png.len(), "Rendered icon");
        IconDirEntry::new(size, png)
    }
}

//===========================================================================//


//===========================================================================//
