//! Binary masks, rectangular dilation and 8-connected labelling.

/// A row-major boolean image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let bits = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.bits[y * self.width + x] = on;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Dilate with a `kernel_w` x `kernel_h` rectangle centred on each pixel.
    ///
    /// Done as two separable passes using running counts, so the cost does
    /// not grow with the kernel size.
    pub fn dilate(&self, kernel_w: usize, kernel_h: usize) -> Mask {
        let (w, h) = (self.width, self.height);
        let (left, right) = (kernel_w / 2, kernel_w.saturating_sub(1) - kernel_w / 2);
        let (up, down) = (kernel_h / 2, kernel_h.saturating_sub(1) - kernel_h / 2);

        let mut horizontal = Mask::new(w, h);
        for y in 0..h {
            let row = &self.bits[y * w..(y + 1) * w];
            let prefix = prefix_counts(row.iter().copied());
            for x in 0..w {
                let lo = x.saturating_sub(right);
                let hi = (x + left + 1).min(w);
                horizontal.bits[y * w + x] = prefix[hi] > prefix[lo];
            }
        }

        let mut out = Mask::new(w, h);
        for x in 0..w {
            let prefix = prefix_counts((0..h).map(|y| horizontal.bits[y * w + x]));
            for y in 0..h {
                let lo = y.saturating_sub(down);
                let hi = (y + up + 1).min(h);
                out.bits[y * w + x] = prefix[hi] > prefix[lo];
            }
        }
        out
    }

    /// 8-connected components, in scan order of their first pixel.
    pub fn components(&self) -> Vec<Component> {
        let (w, h) = (self.width, self.height);
        let mut seen = vec![false; w * h];
        let mut found = Vec::new();
        let mut stack = Vec::new();

        for start in 0..w * h {
            if !self.bits[start] || seen[start] {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            let mut component = Component::seed(start % w, start / w);

            while let Some(i) = stack.pop() {
                let (x, y) = (i % w, i / w);
                component.include(x, y);
                for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        let j = ny * w + nx;
                        if self.bits[j] && !seen[j] {
                            seen[j] = true;
                            stack.push(j);
                        }
                    }
                }
            }
            found.push(component);
        }
        found
    }
}

fn prefix_counts(bits: impl Iterator<Item = bool>) -> Vec<u32> {
    let mut prefix = vec![0u32];
    let mut acc = 0u32;
    for b in bits {
        acc += b as u32;
        prefix.push(acc);
    }
    prefix
}

/// One connected region with its bounding box and member pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
    pub pixels: Vec<(usize, usize)>,
}

impl Component {
    fn seed(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            pixels: Vec::new(),
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.pixels.push((x, y));
    }

    /// Bounding-box width in pixels (inclusive).
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    pub fn bbox_area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}
